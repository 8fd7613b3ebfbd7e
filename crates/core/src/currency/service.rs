//! Currency service: lookups and cross-rates over the cached rate set.
//!
//! This is the entry point the router calls. Reads go through the cache
//! and fall back to a lenient fetch; [`CurrencyService::force_refresh`]
//! fetches strictly and overwrites the cache.

use std::sync::Arc;
use std::time::Duration;

use kur_shared::CurrencyConfig;
use tracing::{debug, info};

use super::cache::RateCache;
use super::clock::{Clock, SystemClock};
use super::error::{CurrencyError, FetchError};
use super::exchange::{ExchangeRateInfo, cross_rate};
use super::fetcher::{BaseCurrency, FetchPolicy, RateFetcher};
use super::source::HttpRateSource;
use super::types::{Currency, normalize_code};

/// Cache key and lifetime for the rate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Key the rate set is stored under.
    pub key: String,
    /// How long a fetched set stays fresh.
    pub ttl: Duration,
}

impl CacheSettings {
    /// Creates settings with a TTL given in minutes.
    #[must_use]
    pub fn from_minutes(key: impl Into<String>, minutes: u64) -> Self {
        Self {
            key: key.into(),
            ttl: Duration::from_secs(minutes.saturating_mul(60)),
        }
    }
}

/// Serves currency lookups and cross-rates.
#[derive(Clone)]
pub struct CurrencyService {
    cache: RateCache,
    fetcher: RateFetcher,
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
}

impl CurrencyService {
    /// Creates a service from its collaborators.
    pub fn new(
        cache: RateCache,
        fetcher: RateFetcher,
        settings: CacheSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            settings,
            clock,
        }
    }

    /// Wires an HTTP-backed service from configuration, on the wall clock.
    pub fn from_config(config: &CurrencyConfig) -> Result<Self, FetchError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let source = HttpRateSource::new(
            config.feed_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let fetcher = RateFetcher::new(
            Arc::new(source),
            BaseCurrency::new(config.base_code.clone(), config.base_name.clone()),
            clock.clone(),
        );

        Ok(Self::new(
            RateCache::new(clock.clone()),
            fetcher,
            CacheSettings::from_minutes(config.cache_key.clone(), config.cache_duration_minutes),
            clock,
        ))
    }

    /// Returns the cache settings in use.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Returns `true` if an unexpired rate set is cached.
    pub fn has_cached_rates(&self) -> bool {
        self.cache.try_get(&self.settings.key).is_some()
    }

    /// Returns every currency in the current rate set.
    ///
    /// An empty result means the upstream fetch failed this round.
    pub async fn list_all(&self) -> Vec<Currency> {
        let fetcher = &self.fetcher;
        self.cache
            .get_or_populate(&self.settings.key, self.settings.ttl, move || async move {
                // The lenient policy never yields Err.
                fetcher
                    .fetch(FetchPolicy::SwallowAndEmpty)
                    .await
                    .unwrap_or_default()
            })
            .await
    }

    /// Looks up a currency by code, ignoring case.
    pub async fn get_by_code(&self, code: &str) -> Option<Currency> {
        let wanted = normalize_code(code);
        let found = self
            .list_all()
            .await
            .into_iter()
            .find(|c| c.code == wanted);

        if found.is_none() {
            debug!(code = %wanted, "Currency not in rate set");
        }
        found
    }

    /// Computes how many units of `to_code` one unit of `from_code` buys,
    /// from the forex selling rates.
    pub async fn get_exchange_rate(
        &self,
        from_code: &str,
        to_code: &str,
    ) -> Result<ExchangeRateInfo, CurrencyError> {
        let currencies = self.list_all().await;
        let from = find(&currencies, from_code)?;
        let to = find(&currencies, to_code)?;

        let rate = cross_rate(from, to)?;
        Ok(ExchangeRateInfo::new(rate, self.clock.now()))
    }

    /// Fetches the rate sheet now and replaces the cached set.
    ///
    /// Unlike the read path, fetch failures are returned to the caller and
    /// leave the cache untouched.
    pub async fn force_refresh(&self) -> Result<Vec<Currency>, CurrencyError> {
        let currencies = self.fetcher.fetch(FetchPolicy::Propagate).await?;
        self.cache
            .set(&self.settings.key, currencies.clone(), self.settings.ttl);

        info!(
            key = %self.settings.key,
            count = currencies.len(),
            "Rate set refreshed"
        );
        Ok(currencies)
    }
}

fn find<'a>(currencies: &'a [Currency], code: &str) -> Result<&'a Currency, CurrencyError> {
    let wanted = normalize_code(code);
    currencies
        .iter()
        .find(|c| c.code == wanted)
        .ok_or(CurrencyError::NotFound(wanted))
}
