//! Internal helpers for input validation and stored-value conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use std::str::FromStr;

use crate::{LedgerError, ResultLedger};

/// A trade amount must be finite and strictly positive.
pub(crate) fn validate_amount(amount: f64) -> ResultLedger<f64> {
    if !amount.is_finite() {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be a finite number, got {amount}"
        )));
    }
    if amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(amount)
}

/// A manually entered vault balance must be finite and not negative.
pub(crate) fn validate_balance(balance: f64, label: &str) -> ResultLedger<f64> {
    if !balance.is_finite() || balance < 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "{label} balance must be a finite number >= 0, got {balance}"
        )));
    }
    Ok(balance)
}

/// A rate must be finite and strictly positive.
pub(crate) fn validate_rate(rate: f64, label: &str) -> ResultLedger<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(LedgerError::InvalidRate(format!(
            "{label} rate must be a finite number > 0, got {rate}"
        )));
    }
    Ok(rate)
}

/// Parse a stored scalar, reporting the key on failure.
pub(crate) fn parse_stored<T: FromStr>(key: &str, raw: &str) -> ResultLedger<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| LedgerError::CorruptedEntry {
            key: key.to_string(),
            reason: err.to_string(),
        })
}

/// Parse a stored number; `NaN` and infinities count as corruption.
pub(crate) fn parse_stored_number(key: &str, raw: &str) -> ResultLedger<f64> {
    let value: f64 = parse_stored(key, raw)?;
    if !value.is_finite() {
        return Err(LedgerError::CorruptedEntry {
            key: key.to_string(),
            reason: format!("not a finite number: {raw}"),
        });
    }
    Ok(value)
}

/// Parse a stored rate; anything but a finite number > 0 counts as corruption.
pub(crate) fn parse_stored_rate(key: &str, raw: &str) -> ResultLedger<f64> {
    let value = parse_stored_number(key, raw)?;
    validate_rate(value, key).map_err(|err| LedgerError::CorruptedEntry {
        key: key.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_rejects_non_positive_and_non_finite() {
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
        assert_eq!(validate_amount(0.01).unwrap(), 0.01);
    }

    #[test]
    fn balance_accepts_zero() {
        assert_eq!(validate_balance(0.0, "usd").unwrap(), 0.0);
        assert!(validate_balance(-0.5, "usd").is_err());
        assert!(validate_balance(f64::NAN, "usd").is_err());
    }

    #[test]
    fn rate_rejects_zero() {
        assert!(matches!(
            validate_rate(0.0, "buy"),
            Err(LedgerError::InvalidRate(_))
        ));
        assert!(validate_rate(f64::NEG_INFINITY, "sell").is_err());
    }

    #[test]
    fn parse_stored_reports_key() {
        let err = parse_stored::<f64>("vault.usd", "abc").unwrap_err();
        assert!(matches!(err, LedgerError::CorruptedEntry { key, .. } if key == "vault.usd"));
        assert_eq!(parse_stored::<u32>("quota.count", " 7 ").unwrap(), 7);
    }

    #[test]
    fn stored_number_must_be_finite() {
        assert!(parse_stored_number("rates.buy", "NaN").is_err());
        assert!(parse_stored_number("rates.buy", "inf").is_err());
        assert_eq!(parse_stored_number("rates.buy", "98000").unwrap(), 98_000.0);
    }

    #[test]
    fn stored_rate_must_be_positive() {
        for raw in ["0", "-1", "inf"] {
            assert!(matches!(
                parse_stored_rate("rates.sell", raw),
                Err(LedgerError::CorruptedEntry { key, .. }) if key == "rates.sell"
            ));
        }
        assert_eq!(parse_stored_rate("rates.sell", "100000").unwrap(), 100_000.0);
    }
}
