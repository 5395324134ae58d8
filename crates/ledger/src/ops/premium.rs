use chrono::{DateTime, Utc};

use crate::{LedgerError, PremiumEvent, PremiumStatus, ResultLedger};

use super::ExchangeLedger;

impl ExchangeLedger {
    /// Grants premium for `duration_days` starting at `now`, replacing any
    /// current expiry.
    pub fn activate_premium(&mut self, duration_days: u32, now: DateTime<Utc>) -> ResultLedger<()> {
        if duration_days == 0 {
            return Err(LedgerError::InvalidAmount(
                "premium duration must be at least one day".to_string(),
            ));
        }
        self.state.quota.activate(duration_days, now);
        self.touch();
        tracing::info!(
            "premium activated for {duration_days} days, expires {:?}",
            self.state.quota.premium_expiry
        );
        Ok(())
    }

    pub fn deactivate_premium(&mut self) {
        self.state.quota.deactivate();
        self.touch();
        tracing::info!("premium deactivated");
    }

    /// Moves an expired subscription back to the free tier.
    ///
    /// Meant to be called on load and periodically by the host. The quota
    /// counter and balances are left as they are.
    pub fn refresh_premium(&mut self, now: DateTime<Utc>) -> Option<PremiumEvent> {
        let event = self.state.quota.refresh(now)?;
        self.touch();
        tracing::warn!("premium expired: {event:?}");
        Some(event)
    }

    pub fn premium_status(&self, now: DateTime<Utc>) -> PremiumStatus {
        self.state.quota.status(now)
    }

    /// Free transactions left before the quota kicks in; `None` for premium.
    pub fn remaining_free_transactions(&self) -> Option<u32> {
        self.state.quota.remaining()
    }
}
