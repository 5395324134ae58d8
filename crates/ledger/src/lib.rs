//! Bookkeeping core of a USD/LBP exchange desk.
//!
//! [`ExchangeLedger`] owns the rates, the vault and box balances, the trade
//! history and the quota/premium state. Every operation is synchronous and
//! works on memory; persistence goes through an explicit
//! [`ExchangeLedger::load`]/[`ExchangeLedger::save`] pair over a
//! [`KeyValueStore`], and [`ExchangeLedger::transact`] couples a mutation with
//! its save so a failed write never leaves a half-applied trade behind.

pub use backup::{Backup, BackupPreference};
pub use balances::{BoxBalances, VaultBalances};
pub use currency::Currency;
pub use error::LedgerError;
pub use money::{format_amount, parse_amount};
pub use ops::{ExchangeLedger, ExchangeLedgerBuilder};
pub use quota::{PremiumEvent, PremiumStatus, QuotaState};
pub use rates::ExchangeRates;
pub use settings::{ADMIN_SETTINGS_KEY, AdminSettings, SettingChange};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StoreOp};
pub use transactions::{Quote, Receipt, Transaction, total_profit};

pub mod backup;
pub mod balances;
mod currency;
mod error;
pub mod export;
mod money;
mod ops;
pub mod quota;
pub mod rates;
mod settings;
mod storage;
mod transactions;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;
