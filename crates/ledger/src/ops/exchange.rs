use chrono::{DateTime, Utc};

use crate::{
    Currency, KeyValueStore, LedgerError, Quote, Receipt, ResultLedger, Transaction, total_profit,
};

use super::ExchangeLedger;

impl ExchangeLedger {
    /// Prices a trade at the current rates without booking it.
    pub fn quote(&self, input_currency: Currency, amount: f64) -> ResultLedger<Quote> {
        Quote::compute(&self.state.rates, input_currency, amount)
    }

    /// Books a trade.
    ///
    /// Validation runs first (amount, then quota); on failure nothing is
    /// touched. On success the history grows by one record, the quota
    /// counter by one, the vault receives `amount` and pays out `result`, and
    /// the LBP principal is credited to the attributed box.
    pub fn record_transaction(
        &mut self,
        input_currency: Currency,
        amount: f64,
        now: DateTime<Utc>,
    ) -> ResultLedger<Receipt> {
        let quote = self.quote(input_currency, amount)?;

        let quota = &self.state.quota;
        if quota.is_exhausted() {
            tracing::warn!(
                "free limit reached ({}/{})",
                quota.transaction_count,
                quota.free_limit
            );
            return Err(LedgerError::QuotaExceeded {
                limit: quota.free_limit,
            });
        }

        self.state
            .transactions
            .push(Transaction::from_quote(&quote, now));
        self.state.quota.transaction_count = self.state.quota.transaction_count.saturating_add(1);
        self.state.vault.apply(&quote);
        self.state.boxes.credit(&quote);
        self.touch();

        tracing::info!(
            "{} (profit {:.2} LBP, {})",
            quote.description,
            quote.profit,
            if quote.to_my_box { "my box" } else { "his box" }
        );

        Ok(quote.into())
    }

    /// Books a trade and persists it; see [`record_transaction`](Self::record_transaction)
    /// and [`transact`](Self::transact).
    pub async fn commit_transaction<S: KeyValueStore>(
        &mut self,
        store: &S,
        input_currency: Currency,
        amount: f64,
        now: DateTime<Utc>,
    ) -> ResultLedger<Receipt> {
        self.transact(store, |ledger| {
            ledger.record_transaction(input_currency, amount, now)
        })
        .await
    }

    /// Sum of the profit of every stored transaction, in LBP.
    pub fn total_profit(&self) -> f64 {
        total_profit(&self.state.transactions)
    }
}
