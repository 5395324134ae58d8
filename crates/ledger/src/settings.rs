//! Global settings pushed by the admin back-office.
//!
//! The admin side writes an [`AdminSettings`] JSON document under
//! [`ADMIN_SETTINGS_KEY`]; the host application reads it whenever it suspects
//! a change and hands it to [`ExchangeLedger::apply_admin_settings`].
//!
//! [`ExchangeLedger::apply_admin_settings`]: crate::ExchangeLedger::apply_admin_settings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    KeyValueStore, LedgerError, ResultLedger,
    quota::DEFAULT_FREE_LIMIT,
    rates::{DEFAULT_BUY_RATE, DEFAULT_SELL_RATE},
};

pub const ADMIN_SETTINGS_KEY: &str = "admin.settings";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminSettings {
    pub global_buy_rate: f64,
    pub global_sell_rate: f64,
    pub free_transaction_limit: u32,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            global_buy_rate: DEFAULT_BUY_RATE,
            global_sell_rate: DEFAULT_SELL_RATE,
            free_transaction_limit: DEFAULT_FREE_LIMIT,
        }
    }
}

impl AdminSettings {
    /// Reads the published settings, `None` if the admin never published any.
    pub async fn load<S: KeyValueStore>(store: &S) -> ResultLedger<Option<Self>> {
        let Some(raw) = store.get_item(ADMIN_SETTINGS_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| LedgerError::CorruptedEntry {
                key: ADMIN_SETTINGS_KEY.to_string(),
                reason: err.to_string(),
            })
    }

    /// Publishes the settings for every ledger reading the same store.
    pub async fn publish<S: KeyValueStore>(&self, store: &S) -> ResultLedger<()> {
        let raw = serde_json::to_string(self)?;
        store.set_item(ADMIN_SETTINGS_KEY, &raw).await
    }
}

/// A value changed by applying admin settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingChange {
    FreeLimit { from: u32, to: u32 },
    BuyRate { from: f64, to: f64 },
    SellRate { from: f64, to: f64 },
}

impl fmt::Display for SettingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeLimit { to, .. } => write!(f, "Transaction limit updated to {to}."),
            Self::BuyRate { to, .. } => write!(f, "Buy rate updated to {to}."),
            Self::SellRate { to, .. } => write!(f, "Sell rate updated to {to}."),
        }
    }
}
