//! Trade primitives.
//!
//! A [`Quote`] is the priced outcome of a trade before it is booked; a
//! [`Transaction`] is the immutable history record created once the quote is
//! committed.
//!
//! Two scenarios exist, selected by the currency the customer pays with:
//!
//! - **USD in** (customer sells dollars): `result = amount * buy_rate` LBP,
//!   `profit = amount * spread`, attributed to *My Box*.
//! - **LBP in** (customer buys dollars): `result = amount / sell_rate` USD,
//!   `profit = result * spread`, attributed to *His Box*.
//!
//! Profit is in LBP in both scenarios: in the LBP-in case `result` is a
//! dollar amount and the spread is LBP per dollar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Currency, ExchangeRates, LedgerError, ResultLedger, money::format_amount,
    util::validate_amount,
};

/// Priced trade, not yet booked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub input_currency: Currency,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub to_my_box: bool,
    pub profit: f64,
    pub description: String,
}

impl Quote {
    /// Prices a trade at the given rates.
    ///
    /// Fails with [`LedgerError::InvalidAmount`] on an invalid amount, or when
    /// the amount is so large that the result or the profit overflows.
    pub fn compute(
        rates: &ExchangeRates,
        input_currency: Currency,
        amount: f64,
    ) -> ResultLedger<Self> {
        let amount = validate_amount(amount)?;
        let spread = rates.spread();

        let (result, rate, profit, to_my_box) = match input_currency {
            Currency::Usd => {
                let result = amount * rates.buy_rate;
                (result, rates.buy_rate, amount * spread, true)
            }
            Currency::Lbp => {
                let result = amount / rates.sell_rate;
                (result, rates.sell_rate, result * spread, false)
            }
        };
        if !result.is_finite() || !profit.is_finite() {
            return Err(LedgerError::InvalidAmount(format!(
                "amount {amount} is too large to convert"
            )));
        }
        let to_currency = input_currency.counterpart();
        let description = format!(
            "Customer gives {amount} {}, gets {}",
            input_currency.code(),
            format_amount(result, to_currency)
        );

        Ok(Self {
            input_currency,
            amount,
            result,
            rate,
            from_currency: input_currency,
            to_currency,
            to_my_box,
            profit,
            description,
        })
    }

    /// LBP principal moved by the trade, used for box attribution.
    #[must_use]
    pub fn principal_lbp(&self) -> f64 {
        match self.input_currency {
            Currency::Usd => self.result,
            Currency::Lbp => self.amount,
        }
    }
}

/// Booked trade. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub input_currency: Currency,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub to_my_box: bool,
    pub profit: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn from_quote(quote: &Quote, timestamp: DateTime<Utc>) -> Self {
        Self {
            input_currency: quote.input_currency,
            amount: quote.amount,
            result: quote.result,
            rate: quote.rate,
            from_currency: quote.from_currency,
            to_currency: quote.to_currency,
            to_my_box: quote.to_my_box,
            profit: quote.profit,
            timestamp,
        }
    }

    /// Human label of the box the trade was attributed to.
    #[must_use]
    pub fn box_label(&self) -> &'static str {
        if self.to_my_box { "My Box" } else { "His Box" }
    }
}

/// What the caller gets back from a committed trade.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub result: f64,
    pub profit: f64,
    pub to_my_box: bool,
    pub description: String,
}

impl From<Quote> for Receipt {
    fn from(quote: Quote) -> Self {
        Self {
            result: quote.result,
            profit: quote.profit,
            to_my_box: quote.to_my_box,
            description: quote.description,
        }
    }
}

/// Sum of `profit` over `transactions`.
#[must_use]
pub fn total_profit(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.profit).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_in_pays_lbp_at_buy_rate() {
        let quote = Quote::compute(&ExchangeRates::default(), Currency::Usd, 500.0).unwrap();
        assert_eq!(quote.result, 49_000_000.0);
        assert_eq!(quote.profit, 1_000_000.0);
        assert_eq!(quote.rate, 98_000.0);
        assert_eq!(quote.from_currency, Currency::Usd);
        assert_eq!(quote.to_currency, Currency::Lbp);
        assert!(quote.to_my_box);
        assert_eq!(quote.description, "Customer gives 500 USD, gets 49000000 LBP");
    }

    #[test]
    fn lbp_in_pays_usd_at_sell_rate() {
        let quote =
            Quote::compute(&ExchangeRates::default(), Currency::Lbp, 50_000_000.0).unwrap();
        assert_eq!(quote.result, 500.0);
        assert_eq!(quote.profit, 1_000_000.0);
        assert_eq!(quote.rate, 100_000.0);
        assert_eq!(quote.from_currency, Currency::Lbp);
        assert_eq!(quote.to_currency, Currency::Usd);
        assert!(!quote.to_my_box);
        assert_eq!(
            quote.description,
            "Customer gives 50000000 LBP, gets 500.00 USD"
        );
    }

    #[test]
    fn lbp_in_profit_is_in_lbp() {
        // 150_000 LBP buys 1.5 USD; 1.5 USD * 2_000 LBP/USD = 3_000 LBP.
        let quote = Quote::compute(&ExchangeRates::default(), Currency::Lbp, 150_000.0).unwrap();
        assert_eq!(quote.result, 1.5);
        assert_eq!(quote.profit, 3_000.0);
    }

    #[test]
    fn box_attribution_ignores_rate_direction() {
        let inverted = ExchangeRates::new(100_000.0, 98_000.0).unwrap();
        let usd = Quote::compute(&inverted, Currency::Usd, 1.0).unwrap();
        let lbp = Quote::compute(&inverted, Currency::Lbp, 98_000.0).unwrap();
        assert!(usd.to_my_box);
        assert!(!lbp.to_my_box);
        assert_eq!(usd.profit, -2_000.0);
        assert_eq!(lbp.profit, -2_000.0);
    }

    #[test]
    fn principal_is_always_lbp() {
        let rates = ExchangeRates::default();
        let usd = Quote::compute(&rates, Currency::Usd, 2.0).unwrap();
        let lbp = Quote::compute(&rates, Currency::Lbp, 300_000.0).unwrap();
        assert_eq!(usd.principal_lbp(), 196_000.0);
        assert_eq!(lbp.principal_lbp(), 300_000.0);
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        let rates = ExchangeRates::default();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Quote::compute(&rates, Currency::Usd, amount),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn overflowing_result_is_rejected() {
        assert!(matches!(
            Quote::compute(&ExchangeRates::default(), Currency::Usd, 1e305),
            Err(LedgerError::InvalidAmount(_))
        ));
        let tiny_sell = ExchangeRates::new(0.0001, 0.001).unwrap();
        assert!(matches!(
            Quote::compute(&tiny_sell, Currency::Lbp, 1e307),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn timestamp_is_stored_as_epoch_millis() {
        let quote = Quote::compute(&ExchangeRates::default(), Currency::Usd, 1.0).unwrap();
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let tx = Transaction::from_quote(&quote, at);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_123_i64);
        assert_eq!(json["input_currency"], "USD");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
