//! Rate set caching using Moka.
//!
//! Each entry carries its own absolute expiry, checked against the
//! injected [`Clock`]. Moka evicts entries once their TTL has elapsed in
//! real time so expired sets do not linger in memory.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use moka::Expiry;
use moka::ops::compute::Op;
use moka::sync::Cache;
use tracing::debug;

use super::clock::Clock;
use super::types::Currency;

/// Default cache capacity (number of keys).
const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Upper bound on how long moka keeps an entry around.
const MAX_EVICTION_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone)]
struct CachedRateSet {
    currencies: Arc<Vec<Currency>>,
    expires_at: DateTime<Utc>,
    ttl: Duration,
}

struct RateSetExpiry;

impl Expiry<String, CachedRateSet> for RateSetExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedRateSet,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl.min(MAX_EVICTION_DELAY))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedRateSet,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl.min(MAX_EVICTION_DELAY))
    }
}

/// Key/value store of rate sets with per-entry TTL.
///
/// Thread-safe. Concurrent misses on the same key may each populate the
/// entry; the last write wins.
#[derive(Clone)]
pub struct RateCache {
    cache: Cache<String, CachedRateSet>,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Creates a cache with the default capacity.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY, clock)
    }

    /// Creates a cache holding at most `max_capacity` keys.
    pub fn with_capacity(max_capacity: u64, clock: Arc<dyn Clock>) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(RateSetExpiry)
            .build();

        Self { cache, clock }
    }

    /// Returns the cached set for `key` if present and unexpired.
    pub fn try_get(&self, key: &str) -> Option<Vec<Currency>> {
        let entry = self.cache.get(key)?;
        if self.clock.now() < entry.expires_at {
            return Some(entry.currencies.as_ref().clone());
        }

        debug!(key, expired_at = %entry.expires_at, "Rate set expired");
        self.remove_if_expired(key);
        None
    }

    /// Removes the entry for `key` only if the one stored now has expired.
    ///
    /// A set written after the caller saw the stale entry is left alone.
    fn remove_if_expired(&self, key: &str) {
        let now = self.clock.now();
        self.cache
            .entry_by_ref(key)
            .and_compute_with(|current| match current {
                Some(entry) if entry.value().expires_at <= now => Op::Remove,
                _ => Op::Nop,
            });
    }

    /// Stores `currencies` under `key`, expiring `ttl` from now.
    pub fn set(&self, key: &str, currencies: Vec<Currency>, ttl: Duration) {
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.cache.insert(
            key.to_string(),
            CachedRateSet {
                currencies: Arc::new(currencies),
                expires_at,
                ttl,
            },
        );
    }

    /// Returns the cached set for `key`, or awaits `producer` and caches its
    /// result for `ttl`.
    ///
    /// An empty result is returned as-is but not stored, so the next call
    /// asks the producer again.
    pub async fn get_or_populate<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Vec<Currency>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Currency>>,
    {
        if let Some(hit) = self.try_get(key) {
            debug!(key, "Rate cache hit");
            return hit;
        }

        debug!(key, "Rate cache miss");
        let fresh = producer().await;
        if fresh.is_empty() {
            debug!(key, "Not caching empty rate set");
        } else {
            self.set(key, fresh.clone(), ttl);
        }
        fresh
    }

    /// Drops the entry for `key`.
    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    /// Entry count after running moka's pending maintenance.
    #[cfg(test)]
    fn settled_entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
