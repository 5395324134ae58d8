use crate::{
    AdminSettings, BoxBalances, ExchangeRates, KeyValueStore, QuotaState, ResultLedger,
    Transaction, VaultBalances, backup::AutoBackup, util::validate_balance,
};

mod backup;
mod balances;
mod exchange;
mod history;
mod persistence;
mod premium;
mod rates;

/// Everything the ledger persists.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LedgerState {
    pub rates: ExchangeRates,
    pub vault: VaultBalances,
    pub boxes: BoxBalances,
    pub transactions: Vec<Transaction>,
    pub quota: QuotaState,
    pub backup: AutoBackup,
}

/// The exchange desk's books.
///
/// Owned by the application's composition root and passed by reference to
/// whoever needs it. Mutations only touch memory and flag the ledger dirty;
/// call [`save`](Self::save) (or use [`transact`](Self::transact)) to persist.
#[derive(Debug, Default)]
pub struct ExchangeLedger {
    state: LedgerState,
    applied_settings: Option<AdminSettings>,
    dirty: bool,
}

impl ExchangeLedger {
    /// Return a builder for `ExchangeLedger`. Help to build the struct.
    pub fn builder() -> ExchangeLedgerBuilder {
        ExchangeLedgerBuilder::default()
    }

    /// `true` when memory holds changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rates(&self) -> ExchangeRates {
        self.state.rates
    }

    pub fn vault(&self) -> VaultBalances {
        self.state.vault
    }

    pub fn boxes(&self) -> BoxBalances {
        self.state.boxes
    }

    pub fn quota(&self) -> QuotaState {
        self.state.quota
    }

    /// Trade history, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    /// Runs `op` and persists its outcome as one unit.
    ///
    /// If `op` fails, or the save that follows it fails, the in-memory state
    /// is restored to what it was before the call. Nothing is written when
    /// the ledger is clean after `op`.
    pub async fn transact<S, T, F>(&mut self, store: &S, op: F) -> ResultLedger<T>
    where
        S: KeyValueStore,
        F: FnOnce(&mut ExchangeLedger) -> ResultLedger<T>,
    {
        let checkpoint = (self.state.clone(), self.applied_settings, self.dirty);

        let value = match op(&mut *self) {
            Ok(value) => value,
            Err(err) => {
                (self.state, self.applied_settings, self.dirty) = checkpoint;
                return Err(err);
            }
        };

        if !self.dirty {
            return Ok(value);
        }

        if let Err(err) = self.save(store).await {
            tracing::error!("failed to persist ledger, rolling back: {err}");
            (self.state, self.applied_settings, self.dirty) = checkpoint;
            return Err(err);
        }

        Ok(value)
    }

    fn touch(&mut self) {
        self.dirty = true;
    }
}

/// The builder for `ExchangeLedger`
#[derive(Default)]
pub struct ExchangeLedgerBuilder {
    rates: Option<(f64, f64)>,
    vault: Option<(f64, f64)>,
    free_limit: Option<u32>,
}

impl ExchangeLedgerBuilder {
    /// Starting buy and sell rates.
    pub fn rates(mut self, buy_rate: f64, sell_rate: f64) -> ExchangeLedgerBuilder {
        self.rates = Some((buy_rate, sell_rate));
        self
    }

    /// Starting vault balances.
    pub fn vault(mut self, lbp: f64, usd: f64) -> ExchangeLedgerBuilder {
        self.vault = Some((lbp, usd));
        self
    }

    /// Free-tier transaction cap.
    pub fn free_limit(mut self, limit: u32) -> ExchangeLedgerBuilder {
        self.free_limit = Some(limit);
        self
    }

    /// Construct `ExchangeLedger`
    pub fn build(self) -> ResultLedger<ExchangeLedger> {
        let mut state = LedgerState::default();
        if let Some((buy_rate, sell_rate)) = self.rates {
            state.rates = ExchangeRates::new(buy_rate, sell_rate)?;
        }
        if let Some((lbp, usd)) = self.vault {
            state.vault = VaultBalances {
                lbp: validate_balance(lbp, "LBP")?,
                usd: validate_balance(usd, "USD")?,
            };
        }
        if let Some(limit) = self.free_limit {
            state.quota.free_limit = limit;
        }
        Ok(ExchangeLedger {
            state,
            applied_settings: None,
            dirty: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::{Currency, MemoryStore};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    #[tokio::test]
    async fn clean_op_writes_nothing() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::default();

        let event = ledger
            .transact(&store, |ledger| Ok(ledger.refresh_premium(now())))
            .await
            .unwrap();
        assert_eq!(event, None);
        let changes = ledger
            .transact(&store, |ledger| {
                Ok(ledger.apply_admin_settings(&AdminSettings::default()))
            })
            .await
            .unwrap();
        assert!(changes.is_empty());
        assert!(store.entries().unwrap().is_empty());

        ledger
            .transact(&store, |ledger| {
                ledger.record_transaction(Currency::Usd, 1.0, now())
            })
            .await
            .unwrap();
        assert!(!store.entries().unwrap().is_empty());
        assert!(!ledger.is_dirty());
    }
}
