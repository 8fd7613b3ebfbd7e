//! Cross-rate types and logic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;
use super::types::Currency;

/// Computed exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateInfo {
    /// `to.forex_selling / from.forex_selling`.
    pub rate: Decimal,
    /// When the rate was computed (not when the quotes were fetched).
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRateInfo {
    /// Creates a new exchange rate result.
    #[must_use]
    pub const fn new(rate: Decimal, last_updated: DateTime<Utc>) -> Self {
        Self { rate, last_updated }
    }
}

/// Ratio of the two currencies' forex selling rates.
///
/// # Errors
///
/// [`CurrencyError::ZeroRate`] when `from` quotes zero, and
/// [`CurrencyError::RateOverflow`] when the ratio does not fit a decimal.
pub fn cross_rate(from: &Currency, to: &Currency) -> Result<Decimal, CurrencyError> {
    if from.forex_selling.is_zero() {
        return Err(CurrencyError::ZeroRate(from.code.clone()));
    }

    to.forex_selling
        .checked_div(from.forex_selling)
        .ok_or_else(|| CurrencyError::RateOverflow {
            from: from.code.clone(),
            to: to.code.clone(),
        })
}
