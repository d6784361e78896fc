//! Per-provider call accounting.

use std::sync::atomic::{AtomicU64, Ordering};

use fxavg_core::endpoint::{parse_base_url, url_prefix};
use fxavg_core::{ApiMetrics, FetchObserver, MetricsReport, ProviderConfig};

struct ProviderCounters {
    name: String,
    prefixes: Vec<String>,
    total: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl ProviderCounters {
    fn new(provider: &ProviderConfig) -> Self {
        let prefixes = std::iter::once(&provider.primary_url)
            .chain(provider.fallback_url.as_ref())
            .map(|raw| canonical_prefix(raw))
            .collect();
        Self {
            name: provider.name.clone(),
            prefixes,
            total: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Length of the longest configured prefix matching `url`.
    fn match_len(&self, url: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .filter(|p| is_under(url, p))
            .map(String::len)
            .max()
    }

    fn snapshot(&self) -> ApiMetrics {
        ApiMetrics {
            name: self.name.clone(),
            total_requests: self.total.load(Ordering::Relaxed),
            successful_requests: self.succeeded.load(Ordering::Relaxed),
            failed_requests: self.failed.load(Ordering::Relaxed),
        }
    }
}

fn canonical_prefix(raw: &str) -> String {
    parse_base_url(raw).map_or_else(
        |_| raw.trim().trim_end_matches('/').to_string(),
        |u| url_prefix(&u).to_string(),
    )
}

// Requested URLs are parsed the same way as configured ones, so default ports
// and host case compare equal on both sides.
fn canonical_url(url: &str) -> String {
    parse_base_url(url).map_or_else(|_| url.trim().to_string(), |u| u.to_string())
}

// `http://host` must not claim `http://host:8080/...`.
fn is_under(url: &str, prefix: &str) -> bool {
    url.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
}

/// Atomic call counters for every configured provider.
///
/// Requested URLs are attributed to a provider by matching them against the
/// provider's primary and fallback base URLs. URLs that match no provider are
/// not counted.
pub struct MetricsCollector {
    providers: Vec<ProviderCounters>,
}

impl MetricsCollector {
    /// Create zeroed counters for `providers`, reported in the given order.
    #[must_use]
    pub fn new(providers: &[ProviderConfig]) -> Self {
        Self {
            providers: providers.iter().map(ProviderCounters::new).collect(),
        }
    }

    fn lookup(&self, url: &str) -> Option<&ProviderCounters> {
        let url = canonical_url(url);
        self.providers
            .iter()
            .filter_map(|p| p.match_len(&url).map(|len| (len, p)))
            .max_by_key(|(len, _)| *len)
            .map(|(_, p)| p)
    }

    /// Name of the provider a URL is attributed to.
    #[must_use]
    pub fn provider_for_url(&self, url: &str) -> Option<&str> {
        self.lookup(url).map(|p| p.name.as_str())
    }

    /// Current value of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsReport {
        MetricsReport {
            apis: self.providers.iter().map(ProviderCounters::snapshot).collect(),
        }
    }
}

impl FetchObserver for MetricsCollector {
    fn on_attempt(&self, url: &str) {
        if let Some(p) = self.lookup(url) {
            p.total.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_outcome(&self, primary_url: &str, success: bool) {
        if let Some(p) = self.lookup(primary_url) {
            let counter = if success { &p.succeeded } else { &p.failed };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("apis", &self.snapshot().apis)
            .finish()
    }
}
