//! Vault (cash on hand) and box (partner attribution) balances.

use serde::{Deserialize, Serialize};

use crate::{Currency, transactions::Quote};

pub const DEFAULT_LBP_BALANCE: f64 = 500_000_000.0;
pub const DEFAULT_USD_BALANCE: f64 = 6_500.0;

/// Physical cash held by the desk.
///
/// Balances are not clamped: an under-funded vault goes negative, which is a
/// fact of the business rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaultBalances {
    pub lbp: f64,
    pub usd: f64,
}

impl Default for VaultBalances {
    fn default() -> Self {
        Self {
            lbp: DEFAULT_LBP_BALANCE,
            usd: DEFAULT_USD_BALANCE,
        }
    }
}

impl VaultBalances {
    fn get_mut(&mut self, currency: Currency) -> &mut f64 {
        match currency {
            Currency::Usd => &mut self.usd,
            Currency::Lbp => &mut self.lbp,
        }
    }

    /// The desk receives what the customer pays and hands out the result.
    pub(crate) fn apply(&mut self, quote: &Quote) {
        *self.get_mut(quote.input_currency) += quote.amount;
        *self.get_mut(quote.input_currency.counterpart()) -= quote.result;
    }
}

/// Cumulative LBP principal attributed to each partner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxBalances {
    pub my_box: f64,
    pub his_box: f64,
}

impl BoxBalances {
    /// Adds the LBP principal of `quote` to the box it is attributed to.
    pub(crate) fn credit(&mut self, quote: &Quote) {
        let principal = quote.principal_lbp();
        if quote.to_my_box {
            self.my_box += principal;
        } else {
            self.his_box += principal;
        }
    }
}
