//! Daily automatic backup of the ledger for premium users.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Transaction};

/// Minimum time between two automatic backups.
pub const BACKUP_INTERVAL_HOURS: i64 = 24;

/// Where automatic backups go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupPreference {
    #[default]
    None,
    /// A JSON file in the configured backup directory.
    Local,
}

impl BackupPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Local => "local",
        }
    }
}

impl TryFrom<&str> for BackupPreference {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "local" | "phone" => Ok(Self::Local),
            other => Err(LedgerError::InvalidBackupPreference(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AutoBackup {
    pub preference: BackupPreference,
    pub last_run: Option<DateTime<Utc>>,
}

impl AutoBackup {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        if self.preference == BackupPreference::None {
            return false;
        }
        self.last_run
            .is_none_or(|last| last <= now - Duration::hours(BACKUP_INTERVAL_HOURS))
    }
}

/// Full copy of the ledger at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub total_profit: f64,
    pub my_box: f64,
    pub his_box: f64,
    pub lbp: f64,
    pub usd: f64,
    pub buy_rate: f64,
    pub sell_rate: f64,
}

impl Backup {
    /// One file per day: `exchange_backup_2026-10-16.json`.
    pub fn file_name(&self) -> String {
        format!("exchange_backup_{}.json", self.timestamp.format("%Y-%m-%d"))
    }
}
