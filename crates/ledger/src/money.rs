//! Parsing and rendering of monetary amounts.
//!
//! Amounts are plain `f64` values: the desk converts LBP to USD by division,
//! so fractional dollars are part of the domain. Validation of the *value*
//! (finite, positive, ...) belongs to the ledger operations; this module only
//! deals with text.

use crate::{Currency, LedgerError, ResultLedger};

/// Parses a decimal string typed by a user into an amount.
///
/// Accepts `.` or `,` as decimal separator, `_` as digit grouping and an
/// optional leading `+`/`-`.
///
/// ```rust
/// use ledger::parse_amount;
///
/// assert_eq!(parse_amount("500").unwrap(), 500.0);
/// assert_eq!(parse_amount("12,5").unwrap(), 12.5);
/// assert_eq!(parse_amount("50_000_000").unwrap(), 50_000_000.0);
/// assert!(parse_amount("1.2.3").is_err());
/// ```
pub fn parse_amount(s: &str) -> ResultLedger<f64> {
    let empty = || LedgerError::InvalidAmount("empty amount".to_string());
    let invalid = || LedgerError::InvalidAmount(format!("invalid amount: {}", s.trim()));

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace('_', "").replace(',', ".");
    if rest.is_empty() {
        return Err(empty());
    }

    let mut parts = rest.split('.');
    let whole = parts.next().ok_or_else(invalid)?;
    let frac = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(frac) = frac
        && !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let value: f64 = rest.parse().map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// Renders an amount with the fraction digits of its currency, e.g.
/// `49000000 LBP` or `500.00 USD`.
#[must_use]
pub fn format_amount(value: f64, currency: Currency) -> String {
    format!(
        "{value:.prec$} {code}",
        prec = currency.fraction_digits(),
        code = currency.code()
    )
}
