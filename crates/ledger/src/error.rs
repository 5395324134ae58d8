//! The module contains the errors the ledger can throw.
//!
//! Validation errors ([`InvalidAmount`], [`InvalidRate`], [`QuotaExceeded`])
//! are always raised before any state is touched. Storage errors are
//! surfaced to the caller instead of being swallowed.
//!
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`InvalidRate`]: LedgerError::InvalidRate
//!  [`QuotaExceeded`]: LedgerError::QuotaExceeded
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Invalid backup preference: {0}")]
    InvalidBackupPreference(String),
    #[error("Free transaction limit of {limit} reached")]
    QuotaExceeded { limit: u32 },
    #[error("Premium required: {0}")]
    PremiumRequired(String),
    #[error("No transactions to export")]
    NothingToExport,
    #[error("Corrupted entry \"{key}\": {reason}")]
    CorruptedEntry { key: String, reason: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Export(#[from] csv::Error),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRate(a), Self::InvalidRate(b)) => a == b,
            (Self::UnsupportedCurrency(a), Self::UnsupportedCurrency(b)) => a == b,
            (Self::InvalidBackupPreference(a), Self::InvalidBackupPreference(b)) => a == b,
            (Self::QuotaExceeded { limit: a }, Self::QuotaExceeded { limit: b }) => a == b,
            (Self::PremiumRequired(a), Self::PremiumRequired(b)) => a == b,
            (Self::NothingToExport, Self::NothingToExport) => true,
            (
                Self::CorruptedEntry { key: a, reason: r },
                Self::CorruptedEntry { key: b, reason: s },
            ) => a == b && r == s,
            (Self::Storage(a), Self::Storage(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Export(a), Self::Export(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
