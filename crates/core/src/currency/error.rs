//! Currency error types.

use kur_shared::AppError;
use thiserror::Error;

/// Failures while retrieving or parsing the upstream rate sheet.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, timeout, or body read failure.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// The document is not well-formed XML.
    #[error("Malformed rate document: {0}")]
    Xml(String),
}

/// Currency lookup and cross-rate errors.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// No currency with this code in the current rate set.
    #[error("Currency with code {0} not found")]
    NotFound(String),

    /// The source currency quotes a zero selling rate, so no ratio exists.
    #[error("Currency {0} has a zero forex selling rate")]
    ZeroRate(String),

    /// The ratio does not fit in a decimal.
    #[error("Exchange rate from {from} to {to} is out of range")]
    RateOverflow {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },

    /// Upstream fetch failed on a path that propagates failures.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        let message = err.to_string();
        match err {
            CurrencyError::NotFound(_) => Self::NotFound(message),
            CurrencyError::ZeroRate(_) | CurrencyError::RateOverflow { .. } => {
                Self::BusinessRule(message)
            }
            CurrencyError::Fetch(_) => Self::ExternalService(message),
        }
    }
}
