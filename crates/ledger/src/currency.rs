use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// The two currencies handled by the exchange desk.
///
/// Rates are always quoted as LBP per 1 USD, and profits and box balances are
/// always denominated in LBP.
///
/// ## Fraction digits
///
/// `fraction_digits()` tells how many decimals are shown when an amount is
/// rendered for a human (receipts, export). It does not round stored values:
/// an LBP → USD trade yields fractional dollars and the ledger keeps them as
/// computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Lbp,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Lbp => "LBP",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn fraction_digits(self) -> usize {
        match self {
            Currency::Usd => 2,
            Currency::Lbp => 0,
        }
    }

    /// The currency the customer receives when paying with `self`.
    #[must_use]
    pub const fn counterpart(self) -> Currency {
        match self {
            Currency::Usd => Currency::Lbp,
            Currency::Lbp => Currency::Usd,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "LBP" => Ok(Currency::Lbp),
            other => Err(LedgerError::UnsupportedCurrency(other.to_string())),
        }
    }
}
