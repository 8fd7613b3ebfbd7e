//! Currency rates from the upstream feed.

pub mod cache;
pub mod clock;
pub mod error;
pub mod exchange;
pub mod fetcher;
pub mod parser;
pub mod service;
pub mod source;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod props;

pub use cache::RateCache;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use error::{CurrencyError, FetchError};
pub use exchange::{ExchangeRateInfo, cross_rate};
pub use fetcher::{BaseCurrency, FetchPolicy, RateFetcher};
pub use service::{CacheSettings, CurrencyService};
pub use source::{HttpRateSource, RateSource};
pub use types::Currency;
