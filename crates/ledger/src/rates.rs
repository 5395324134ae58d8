//! Exchange rates quoted by the desk, in LBP per 1 USD.

use serde::{Deserialize, Serialize};

use crate::{ResultLedger, util::validate_rate};

pub const DEFAULT_BUY_RATE: f64 = 98_000.0;
pub const DEFAULT_SELL_RATE: f64 = 100_000.0;

/// Buy and sell rates.
///
/// - `buy_rate`: LBP the desk pays for 1 USD bought from a customer.
/// - `sell_rate`: LBP the desk asks for 1 USD sold to a customer.
///
/// Conventionally `sell_rate > buy_rate`, the difference being the margin.
/// An inverted pair is accepted and simply produces negative profits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub buy_rate: f64,
    pub sell_rate: f64,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            buy_rate: DEFAULT_BUY_RATE,
            sell_rate: DEFAULT_SELL_RATE,
        }
    }
}

impl ExchangeRates {
    /// Builds a validated pair of rates (both finite and > 0).
    pub fn new(buy_rate: f64, sell_rate: f64) -> ResultLedger<Self> {
        Ok(Self {
            buy_rate: validate_rate(buy_rate, "buy")?,
            sell_rate: validate_rate(sell_rate, "sell")?,
        })
    }

    /// Margin per USD traded, in LBP.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.sell_rate - self.buy_rate
    }
}
