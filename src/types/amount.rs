use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// A decimal number paired with a currency code, e.g. `123.00 PLN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    #[must_use]
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }

    /// Same currency, different number.
    #[must_use]
    pub fn with_number(&self, number: Decimal) -> Self {
        Self {
            number,
            currency: self.currency.clone(),
        }
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.number.is_sign_negative() && !self.number.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

/// Cost basis attached to a posting (`{100.00 USD, 2024-01-01, "lot"}`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    pub number: Decimal,
    pub currency: String,
    pub date: Option<NaiveDate>,
    pub label: Option<String>,
}

/// Round half away from zero to `dp` decimal places.
///
/// For the non-negative magnitudes the tax engine works with this is the
/// conventional "round half up".
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
