use chrono::{DateTime, Utc};

use crate::{Backup, BackupPreference};

use super::ExchangeLedger;

impl ExchangeLedger {
    pub fn backup_preference(&self) -> BackupPreference {
        self.state.backup.preference
    }

    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        self.state.backup.last_run
    }

    pub fn set_backup_preference(&mut self, preference: BackupPreference) {
        self.state.backup.preference = preference;
        self.touch();
    }

    /// The backup to write now, if one is due.
    ///
    /// Requires premium, a preference other than `none`, a non-empty
    /// history, and no backup within the last day.
    pub fn due_backup(&self, now: DateTime<Utc>) -> Option<Backup> {
        if !self.state.quota.has_premium_at(now)
            || self.state.transactions.is_empty()
            || !self.state.backup.is_due(now)
        {
            return None;
        }
        Some(Backup {
            timestamp: now,
            transactions: self.state.transactions.clone(),
            total_profit: self.total_profit(),
            my_box: self.state.boxes.my_box,
            his_box: self.state.boxes.his_box,
            lbp: self.state.vault.lbp,
            usd: self.state.vault.usd,
            buy_rate: self.state.rates.buy_rate,
            sell_rate: self.state.rates.sell_rate,
        })
    }

    /// Records that a backup was written at `at`.
    pub fn mark_backed_up(&mut self, at: DateTime<Utc>) {
        self.state.backup.last_run = Some(at);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::Currency;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    #[test]
    fn backup_needs_premium_preference_and_history() {
        let mut ledger = ExchangeLedger::default();
        ledger.record_transaction(Currency::Usd, 500.0, now()).unwrap();
        ledger.set_backup_preference(BackupPreference::Local);
        assert!(ledger.due_backup(now()).is_none());

        ledger.activate_premium(30, now()).unwrap();
        let backup = ledger.due_backup(now()).unwrap();
        assert_eq!(backup.transactions.len(), 1);
        assert_eq!(backup.total_profit, 1_000_000.0);
        assert_eq!(backup.my_box, 49_000_000.0);
        assert_eq!(backup.usd, 7_000.0);

        ledger.mark_backed_up(now());
        assert!(ledger.due_backup(now() + Duration::hours(23)).is_none());
        assert!(ledger.due_backup(now() + Duration::hours(24)).is_some());

        ledger.set_backup_preference(BackupPreference::None);
        assert!(ledger.due_backup(now() + Duration::days(3)).is_none());
    }
}
