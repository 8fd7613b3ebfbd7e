//! Fetch-and-parse of the upstream rate sheet.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::error::FetchError;
use super::parser::parse_feed;
use super::source::RateSource;
use super::types::Currency;

/// What to do when the upstream document cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Log the failure and return an empty set. Used on the read-through
    /// path, where an empty set means "degraded", not "no currencies".
    SwallowAndEmpty,
    /// Return the failure to the caller. Used by explicit refreshes.
    Propagate,
}

/// The local currency every rate is quoted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCurrency {
    /// Currency code.
    pub code: String,
    /// Display name.
    pub name: String,
}

impl BaseCurrency {
    /// Creates a base currency descriptor.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl Default for BaseCurrency {
    fn default() -> Self {
        Self::new("TRY", "TÜRK LİRASI")
    }
}

/// Turns the upstream document into a complete rate set.
#[derive(Clone)]
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    base: BaseCurrency,
    clock: Arc<dyn Clock>,
}

impl RateFetcher {
    /// Creates a fetcher reading from `source`.
    pub fn new(source: Arc<dyn RateSource>, base: BaseCurrency, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            base,
            clock,
        }
    }

    /// Returns the configured base currency.
    pub fn base(&self) -> &BaseCurrency {
        &self.base
    }

    /// Fetches and parses the current rate set.
    ///
    /// On success the set ends with the synthetic base record and every
    /// record carries the same fetch timestamp. Failures are handled as
    /// `policy` dictates.
    pub async fn fetch(&self, policy: FetchPolicy) -> Result<Vec<Currency>, FetchError> {
        match self.fetch_and_parse().await {
            Ok(currencies) => {
                info!(
                    source = self.source.describe(),
                    count = currencies.len(),
                    "Fetched rate sheet"
                );
                Ok(currencies)
            }
            Err(e) => match policy {
                FetchPolicy::SwallowAndEmpty => {
                    warn!(
                        source = self.source.describe(),
                        error = %e,
                        "Rate sheet fetch failed, serving empty set"
                    );
                    Ok(Vec::new())
                }
                FetchPolicy::Propagate => Err(e),
            },
        }
    }

    async fn fetch_and_parse(&self) -> Result<Vec<Currency>, FetchError> {
        let document = self.source.fetch_document().await?;
        let fetched_at = self.clock.now();
        let mut currencies = parse_feed(&document, fetched_at)?;

        let before = currencies.len();
        currencies.retain(|c| !c.has_code(&self.base.code));
        if currencies.len() != before {
            debug!(code = %self.base.code, "Dropped upstream entry shadowing the base currency");
        }

        currencies.push(Currency::base(
            self.base.code.clone(),
            self.base.name.clone(),
            fetched_at,
        ));
        Ok(currencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::clock::ManualClock;
    use crate::currency::testing::StaticRateSource;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn fetcher_with(source: Arc<StaticRateSource>) -> RateFetcher {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
        ));
        RateFetcher::new(source, BaseCurrency::default(), clock)
    }

    #[tokio::test]
    async fn test_fetch_appends_base_currency() {
        let fetcher = fetcher_with(Arc::new(StaticRateSource::sample()));

        let currencies = fetcher.fetch(FetchPolicy::Propagate).await.unwrap();
        let codes: Vec<&str> = currencies.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["USD", "EUR", "XAU", "TRY"]);

        let base = currencies.last().unwrap();
        assert_eq!(base.name, "TÜRK LİRASI");
        assert_eq!(base.forex_buying, Decimal::ONE);
        assert_eq!(base.forex_selling, Decimal::ONE);
        assert_eq!(base.banknote_buying, Decimal::ONE);
        assert_eq!(base.banknote_selling, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_fetch_stamps_every_record_identically() {
        let fetcher = fetcher_with(Arc::new(StaticRateSource::sample()));

        let currencies = fetcher.fetch(FetchPolicy::Propagate).await.unwrap();
        let stamp = currencies[0].last_updated;
        assert!(currencies.iter().all(|c| c.last_updated == stamp));
        assert_eq!(stamp, Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_base_currency_replaces_upstream_duplicate() {
        let source = Arc::new(StaticRateSource::new(
            r#"<Root>
                <Currency CurrencyCode="TRY"><ForexSelling>2.5</ForexSelling></Currency>
                <Currency CurrencyCode="USD"><ForexSelling>30</ForexSelling></Currency>
            </Root>"#,
        ));
        let fetcher = fetcher_with(source);

        let currencies = fetcher.fetch(FetchPolicy::Propagate).await.unwrap();
        let tries: Vec<&Currency> = currencies.iter().filter(|c| c.code == "TRY").collect();
        assert_eq!(tries.len(), 1);
        assert_eq!(tries[0].forex_selling, Decimal::ONE);
        assert_eq!(currencies.len(), 2);
    }

    #[tokio::test]
    async fn test_lowercase_upstream_base_is_dropped() {
        let source = Arc::new(StaticRateSource::new(
            r#"<Root>
                <Currency CurrencyCode="try"><ForexSelling>2.5</ForexSelling></Currency>
                <Currency CurrencyCode="usd"><ForexSelling>30</ForexSelling></Currency>
            </Root>"#,
        ));
        let fetcher = fetcher_with(source);

        let currencies = fetcher.fetch(FetchPolicy::Propagate).await.unwrap();
        let codes: Vec<&str> = currencies.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["USD", "TRY"]);
        assert_eq!(currencies[1].forex_selling, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_configured_base_currency() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let fetcher = RateFetcher::new(
            Arc::new(StaticRateSource::sample()),
            BaseCurrency::new("EUR", "EURO"),
            clock,
        );

        let currencies = fetcher.fetch(FetchPolicy::Propagate).await.unwrap();
        let eur = currencies.iter().find(|c| c.code == "EUR").unwrap();
        assert_eq!(eur.forex_selling, Decimal::ONE);
        assert_eq!(currencies.iter().filter(|c| c.code == "EUR").count(), 1);
        assert!(currencies.iter().all(|c| c.code != "TRY"));
    }

    #[tokio::test]
    async fn test_swallow_policy_returns_empty_on_http_error() {
        let source = Arc::new(StaticRateSource::failing(503));
        let fetcher = fetcher_with(source.clone());

        let currencies = fetcher.fetch(FetchPolicy::SwallowAndEmpty).await.unwrap();
        assert!(currencies.is_empty());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_swallow_policy_returns_empty_on_bad_xml() {
        let fetcher = fetcher_with(Arc::new(StaticRateSource::new("<Tarih_Date>")));

        let currencies = fetcher.fetch(FetchPolicy::SwallowAndEmpty).await.unwrap();
        assert!(currencies.is_empty());
    }

    #[tokio::test]
    async fn test_propagate_policy_returns_error() {
        let fetcher = fetcher_with(Arc::new(StaticRateSource::failing(500)));
        let err = fetcher.fetch(FetchPolicy::Propagate).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));

        let fetcher = fetcher_with(Arc::new(StaticRateSource::new("garbage")));
        let err = fetcher.fetch(FetchPolicy::Propagate).await.unwrap_err();
        assert!(matches!(err, FetchError::Xml(_)));
    }

    #[tokio::test]
    async fn test_malformed_field_keeps_other_currencies() {
        let source = Arc::new(StaticRateSource::new(
            r#"<Root>
                <Currency CurrencyCode="USD"><ForexSelling>oops</ForexSelling></Currency>
                <Currency CurrencyCode="EUR"><ForexSelling>32.50</ForexSelling></Currency>
            </Root>"#,
        ));
        let fetcher = fetcher_with(source);

        let currencies = fetcher.fetch(FetchPolicy::SwallowAndEmpty).await.unwrap();
        assert_eq!(currencies.len(), 3);
        assert_eq!(currencies[0].forex_selling, Decimal::ZERO);
        assert_eq!(currencies[1].forex_selling, dec!(32.50));
    }
}
