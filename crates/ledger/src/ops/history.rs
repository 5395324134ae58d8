use std::io::Write;

use chrono::{DateTime, Utc};

use crate::{LedgerError, ResultLedger, export};

use super::ExchangeLedger;

impl ExchangeLedger {
    /// Empties the history and resets the quota counter. Rates and balances
    /// are untouched.
    pub fn clear_history(&mut self) {
        let cleared = self.state.transactions.len();
        self.state.transactions.clear();
        self.state.quota.transaction_count = 0;
        self.touch();
        tracing::info!("history cleared ({cleared} transactions)");
    }

    /// Writes the history as CSV. Premium only.
    pub fn export_csv<W: Write>(&self, writer: W, now: DateTime<Utc>) -> ResultLedger<()> {
        if !self.state.quota.has_premium_at(now) {
            return Err(LedgerError::PremiumRequired(
                "export is available for premium users only".to_string(),
            ));
        }
        if self.state.transactions.is_empty() {
            return Err(LedgerError::NothingToExport);
        }
        export::write_csv(&self.state.transactions, writer)
    }
}
