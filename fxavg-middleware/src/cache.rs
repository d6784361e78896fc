use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fxavg_core::{AggregatedRates, CacheKey, FxError};
use moka::future::Cache;

struct CacheEntry {
    created_at: Instant,
    value: Arc<AggregatedRates>,
}

impl CacheEntry {
    fn new(value: AggregatedRates) -> Self {
        Self {
            created_at: Instant::now(),
            value: Arc::new(value),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Time-boxed store of aggregated results keyed by canonical query.
///
/// Entries are immutable once written; a later write for the same key replaces
/// the whole entry. Expired entries read as absent and are reclaimed by moka
/// on its own schedule. A zero TTL disables storage entirely.
pub struct RateCache {
    store: Option<Cache<CacheKey, Arc<CacheEntry>>>,
    ttl: Duration,
}

impl RateCache {
    /// Create a cache holding at most `max_entries` results for `ttl` each.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let store = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .name("fxavg-rates")
                .max_capacity(max_entries.max(1))
                .time_to_live(ttl)
                .build()
        });
        Self { store, ttl }
    }

    /// A cache that never stores anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether results are stored at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<AggregatedRates>> {
        let entry = self.store.as_ref()?.get(key).await?;
        entry.is_fresh(self.ttl).then(|| Arc::clone(&entry.value))
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn put(&self, key: CacheKey, value: AggregatedRates) {
        if let Some(store) = &self.store {
            store.insert(key, Arc::new(CacheEntry::new(value))).await;
        }
    }

    /// Return the fresh value for `key`, or run `init` and store its result.
    ///
    /// Concurrent callers missing on the same key share a single `init` run;
    /// the others wait for it. Errors are handed to every waiter and nothing is
    /// stored, so the next call retries.
    ///
    /// # Errors
    /// Returns the error produced by `init`.
    pub async fn get_or_try_insert_with<F>(
        &self,
        key: CacheKey,
        init: F,
    ) -> Result<Arc<AggregatedRates>, FxError>
    where
        F: Future<Output = Result<AggregatedRates, FxError>>,
    {
        let Some(store) = &self.store else {
            return init.await.map(Arc::new);
        };
        if let Some(entry) = store.get(&key).await {
            if entry.is_fresh(self.ttl) {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %key, "rate cache hit");
                return Ok(Arc::clone(&entry.value));
            }
            // Stale by our clock but maybe not yet by moka's; `try_get_with`
            // would hand it back.
            store.invalidate(&key).await;
        }
        store
            .try_get_with(key, async move { init.await.map(|v| Arc::new(CacheEntry::new(v))) })
            .await
            .map(|entry| Arc::clone(&entry.value))
            .map_err(|e| (*e).clone())
    }

    /// Approximate number of stored entries, including ones not yet reclaimed.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.store.as_ref().map_or(0, Cache::entry_count)
    }
}

impl std::fmt::Debug for RateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateCache")
            .field("ttl", &self.ttl)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
