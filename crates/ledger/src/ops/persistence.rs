//! Snapshot load/save.
//!
//! Each field is stored under its own key. `save` always writes the full
//! snapshot as a single batch, so a crash can never leave the history and the
//! balances out of step.

use chrono::{DateTime, Utc};

use crate::{
    BackupPreference, KeyValueStore, LedgerError, ResultLedger, StoreOp, Transaction,
    util::{parse_stored, parse_stored_number, parse_stored_rate},
};

use super::{ExchangeLedger, LedgerState};

pub(crate) mod keys {
    pub const BUY_RATE: &str = "rates.buy";
    pub const SELL_RATE: &str = "rates.sell";
    pub const TRANSACTIONS: &str = "history.transactions";
    pub const MY_BOX: &str = "boxes.mine";
    pub const HIS_BOX: &str = "boxes.his";
    pub const LBP_BALANCE: &str = "vault.lbp";
    pub const USD_BALANCE: &str = "vault.usd";
    pub const PREMIUM_STATUS: &str = "premium.active";
    pub const PREMIUM_EXPIRY: &str = "premium.expiry";
    pub const TRANSACTION_COUNT: &str = "quota.transaction_count";
    pub const FREE_LIMIT: &str = "quota.free_limit";
    pub const BACKUP_PREFERENCE: &str = "backup.preference";
    pub const LAST_BACKUP: &str = "backup.last_run";
}

fn parse_millis(key: &str, raw: &str) -> ResultLedger<DateTime<Utc>> {
    let millis: i64 = parse_stored(key, raw)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| LedgerError::CorruptedEntry {
        key: key.to_string(),
        reason: format!("timestamp out of range: {millis}"),
    })
}

impl ExchangeLedger {
    /// Loads the ledger from `store`.
    ///
    /// Missing keys fall back to their defaults (a fresh install has none);
    /// unparsable values fail with [`LedgerError::CorruptedEntry`].
    pub async fn load<S: KeyValueStore>(store: &S) -> ResultLedger<Self> {
        let mut state = LedgerState::default();

        if let Some(raw) = store.get_item(keys::BUY_RATE).await? {
            state.rates.buy_rate = parse_stored_rate(keys::BUY_RATE, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::SELL_RATE).await? {
            state.rates.sell_rate = parse_stored_rate(keys::SELL_RATE, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::TRANSACTIONS).await? {
            let transactions: Vec<Transaction> =
                serde_json::from_str(&raw).map_err(|err| LedgerError::CorruptedEntry {
                    key: keys::TRANSACTIONS.to_string(),
                    reason: err.to_string(),
                })?;
            state.quota.transaction_count = u32::try_from(transactions.len()).unwrap_or(u32::MAX);
            state.transactions = transactions;
        }
        if let Some(raw) = store.get_item(keys::MY_BOX).await? {
            state.boxes.my_box = parse_stored_number(keys::MY_BOX, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::HIS_BOX).await? {
            state.boxes.his_box = parse_stored_number(keys::HIS_BOX, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::LBP_BALANCE).await? {
            state.vault.lbp = parse_stored_number(keys::LBP_BALANCE, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::USD_BALANCE).await? {
            state.vault.usd = parse_stored_number(keys::USD_BALANCE, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::PREMIUM_STATUS).await? {
            state.quota.is_premium = parse_stored(keys::PREMIUM_STATUS, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::PREMIUM_EXPIRY).await? {
            state.quota.premium_expiry = Some(parse_millis(keys::PREMIUM_EXPIRY, &raw)?);
        }
        // The stored counter wins over the history length: both are reset
        // together, but the counter is the one the quota is enforced on.
        if let Some(raw) = store.get_item(keys::TRANSACTION_COUNT).await? {
            state.quota.transaction_count = parse_stored(keys::TRANSACTION_COUNT, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::FREE_LIMIT).await? {
            state.quota.free_limit = parse_stored(keys::FREE_LIMIT, &raw)?;
        }
        if let Some(raw) = store.get_item(keys::BACKUP_PREFERENCE).await? {
            state.backup.preference = BackupPreference::try_from(raw.as_str()).map_err(|err| {
                LedgerError::CorruptedEntry {
                    key: keys::BACKUP_PREFERENCE.to_string(),
                    reason: err.to_string(),
                }
            })?;
        }
        if let Some(raw) = store.get_item(keys::LAST_BACKUP).await? {
            state.backup.last_run = Some(parse_millis(keys::LAST_BACKUP, &raw)?);
        }

        tracing::debug!(
            "ledger loaded: {} transactions, premium={}",
            state.transactions.len(),
            state.quota.is_premium
        );

        Ok(Self {
            state,
            applied_settings: None,
            dirty: false,
        })
    }

    /// Writes the full snapshot to `store` in one batch and clears the dirty
    /// flag. On failure memory is left as is (still dirty).
    pub async fn save<S: KeyValueStore>(&mut self, store: &S) -> ResultLedger<()> {
        let ops = self.snapshot_ops()?;
        tracing::debug!("saving ledger snapshot ({} entries)", ops.len());
        store.write_batch(ops).await?;
        self.dirty = false;
        Ok(())
    }

    fn snapshot_ops(&self) -> ResultLedger<Vec<StoreOp>> {
        let state = &self.state;
        let mut ops = vec![
            StoreOp::set(keys::BUY_RATE, state.rates.buy_rate.to_string()),
            StoreOp::set(keys::SELL_RATE, state.rates.sell_rate.to_string()),
            StoreOp::set(
                keys::TRANSACTIONS,
                serde_json::to_string(&state.transactions)?,
            ),
            StoreOp::set(keys::MY_BOX, state.boxes.my_box.to_string()),
            StoreOp::set(keys::HIS_BOX, state.boxes.his_box.to_string()),
            StoreOp::set(keys::LBP_BALANCE, state.vault.lbp.to_string()),
            StoreOp::set(keys::USD_BALANCE, state.vault.usd.to_string()),
            StoreOp::set(keys::PREMIUM_STATUS, state.quota.is_premium.to_string()),
            StoreOp::set(
                keys::TRANSACTION_COUNT,
                state.quota.transaction_count.to_string(),
            ),
            StoreOp::set(keys::FREE_LIMIT, state.quota.free_limit.to_string()),
            StoreOp::set(keys::BACKUP_PREFERENCE, state.backup.preference.as_str()),
        ];
        ops.push(match state.quota.premium_expiry {
            Some(expiry) => StoreOp::set(keys::PREMIUM_EXPIRY, expiry.timestamp_millis().to_string()),
            None => StoreOp::remove(keys::PREMIUM_EXPIRY),
        });
        ops.push(match state.backup.last_run {
            Some(at) => StoreOp::set(keys::LAST_BACKUP, at.timestamp_millis().to_string()),
            None => StoreOp::remove(keys::LAST_BACKUP),
        });
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, MemoryStore};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let ledger = ExchangeLedger::load(&store).await.unwrap();
        assert_eq!(ledger.state, LedgerState::default());
        assert!(!ledger.is_dirty());
    }

    #[tokio::test]
    async fn save_then_load_restores_state() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::default();
        ledger.record_transaction(Currency::Usd, 500.0, now()).unwrap();
        ledger.activate_premium(30, now()).unwrap();
        ledger.set_backup_preference(BackupPreference::Local);
        ledger.mark_backed_up(now());
        ledger.save(&store).await.unwrap();
        assert!(!ledger.is_dirty());

        let loaded = ExchangeLedger::load(&store).await.unwrap();
        assert_eq!(loaded.state, ledger.state);
    }

    #[tokio::test]
    async fn cleared_expiry_is_removed_from_store() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::default();
        ledger.activate_premium(30, now()).unwrap();
        ledger.save(&store).await.unwrap();
        assert!(store.entries().unwrap().contains_key(keys::PREMIUM_EXPIRY));

        ledger.deactivate_premium();
        ledger.save(&store).await.unwrap();
        let entries = store.entries().unwrap();
        assert!(!entries.contains_key(keys::PREMIUM_EXPIRY));
        assert_eq!(entries[keys::PREMIUM_STATUS], "false");
    }

    #[tokio::test]
    async fn counter_defaults_to_history_length() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::default();
        ledger.record_transaction(Currency::Usd, 1.0, now()).unwrap();
        ledger.record_transaction(Currency::Usd, 2.0, now()).unwrap();
        ledger.save(&store).await.unwrap();
        store.remove_item(keys::TRANSACTION_COUNT).await.unwrap();

        let loaded = ExchangeLedger::load(&store).await.unwrap();
        assert_eq!(loaded.quota().transaction_count, 2);
    }

    #[tokio::test]
    async fn corrupted_entry_is_surfaced() {
        let store = MemoryStore::new();
        store.set_item(keys::USD_BALANCE, "lots").await.unwrap();
        let err = ExchangeLedger::load(&store).await.unwrap_err();
        assert!(matches!(err, LedgerError::CorruptedEntry { key, .. } if key == keys::USD_BALANCE));

        let store = MemoryStore::new();
        store.set_item(keys::SELL_RATE, "0").await.unwrap();
        let err = ExchangeLedger::load(&store).await.unwrap_err();
        assert!(matches!(err, LedgerError::CorruptedEntry { key, .. } if key == keys::SELL_RATE));

        let store = MemoryStore::new();
        store.set_item(keys::TRANSACTIONS, "[{").await.unwrap();
        assert!(matches!(
            ExchangeLedger::load(&store).await,
            Err(LedgerError::CorruptedEntry { .. })
        ));
    }
}
