//! Currency quote types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One currency's quoted rates against the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// Currency code (e.g. "USD").
    pub code: String,
    /// Display name as published upstream.
    pub name: String,
    /// Forex buying rate.
    pub forex_buying: Decimal,
    /// Forex selling rate. Cross-rates are computed from this field.
    pub forex_selling: Decimal,
    /// Banknote buying rate.
    pub banknote_buying: Decimal,
    /// Banknote selling rate.
    pub banknote_selling: Decimal,
    /// When the rate set containing this record was fetched.
    pub last_updated: DateTime<Utc>,
}

impl Currency {
    /// Creates the identity record for the base currency: every rate is 1.
    #[must_use]
    pub fn base(code: impl Into<String>, name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            forex_buying: Decimal::ONE,
            forex_selling: Decimal::ONE,
            banknote_buying: Decimal::ONE,
            banknote_selling: Decimal::ONE,
            last_updated: at,
        }
    }

    /// Returns `true` if `code` names this currency, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code == normalize_code(code)
    }
}

/// Normalizes a user-supplied currency code for lookups.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
