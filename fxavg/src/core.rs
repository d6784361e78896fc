use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use fxavg_core::endpoint::parse_base_url;
use fxavg_core::{FxError, MeanStrategy, MetricsReport, ProviderFetcher, Transport};
use fxavg_http::HttpTransport;
use fxavg_middleware::{MetricsCollector, RateCache};
use fxavg_types::{FxAvgConfig, ProviderConfig};
use url::Url;

/// A configured provider with its base URLs already validated.
pub(crate) struct ProviderRoute {
    pub(crate) cfg: ProviderConfig,
    pub(crate) primary: Url,
    pub(crate) fallback: Option<Url>,
}

impl ProviderRoute {
    fn new(cfg: ProviderConfig) -> Result<Self, FxError> {
        let primary = parse_base_url(&cfg.primary_url)?;
        let fallback = cfg.fallback_url.as_deref().map(parse_base_url).transpose()?;
        Ok(Self {
            cfg,
            primary,
            fallback,
        })
    }
}

/// Resolves averaged exchange rates across the configured providers.
///
/// Cheap to share behind an `Arc`; all state (cache, counters) is internally
/// synchronized.
pub struct FxAvg {
    pub(crate) routes: Vec<ProviderRoute>,
    pub(crate) fetcher: ProviderFetcher,
    pub(crate) cache: RateCache,
    pub(crate) metrics: Arc<MetricsCollector>,
    pub(crate) cfg: FxAvgConfig,
}

/// Builder for constructing an `FxAvg` with custom configuration.
pub struct FxAvgBuilder {
    cfg: FxAvgConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for FxAvgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FxAvgBuilder {
    /// Create a new builder with default settings.
    ///
    /// Starts with no providers, a 60s cache TTL, a 10 000 entry cache bound, a
    /// 5s per-attempt timeout, and the `ReportingProviders` mean. Without
    /// [`with_transport`](Self::with_transport), `build` creates an
    /// [`HttpTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(FxAvgConfig::default())
    }

    /// Start from a loaded configuration.
    #[must_use]
    pub const fn from_config(cfg: FxAvgConfig) -> Self {
        Self {
            cfg,
            transport: None,
        }
    }

    /// Register a provider.
    ///
    /// Registration order is the order providers appear in
    /// [`FxAvg::metrics`]. It has no effect on averaging.
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.cfg.providers.push(provider);
        self
    }

    /// Use `transport` for every provider request instead of the default HTTP client.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set how long an aggregated result stays fresh. Zero disables caching.
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.cache_ttl_ms = duration_ms(ttl);
        self
    }

    /// Bound the number of cached results.
    #[must_use]
    pub const fn cache_max_entries(mut self, max: u64) -> Self {
        self.cfg.cache_max_entries = max;
        self
    }

    /// Set the timeout applied to each individual HTTP attempt.
    ///
    /// A provider with a fallback URL can take up to twice this long.
    #[must_use]
    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout_ms = duration_ms(timeout);
        self
    }

    /// Select the divisor used when averaging.
    #[must_use]
    pub const fn mean_strategy(mut self, strategy: MeanStrategy) -> Self {
        self.cfg.mean_strategy = strategy;
        self
    }

    /// Build the `FxAvg` resolver.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no providers are registered, two providers share
    /// a name, a provider URL is not an http(s) base URL, or the provider
    /// timeout is zero. Returns `Other` if the default HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<FxAvg, FxError> {
        if self.cfg.providers.is_empty() {
            return Err(FxError::invalid_arg(
                "no providers registered; add at least one via with_provider(...)",
            ));
        }
        if self.cfg.provider_timeout_ms == 0 {
            return Err(FxError::invalid_arg("provider timeout must be positive"));
        }

        let mut seen = HashSet::new();
        for p in &self.cfg.providers {
            if p.name.trim().is_empty() {
                return Err(FxError::invalid_arg("provider name must not be empty"));
            }
            if !seen.insert(p.name.as_str()) {
                return Err(FxError::invalid_arg(format!(
                    "duplicate provider name: {}",
                    p.name
                )));
            }
        }

        let routes = self
            .cfg
            .providers
            .iter()
            .cloned()
            .map(ProviderRoute::new)
            .collect::<Result<Vec<_>, _>>()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };
        let metrics = Arc::new(MetricsCollector::new(&self.cfg.providers));
        let fetcher = ProviderFetcher::new(transport)
            .with_observer(metrics.clone())
            .with_timeout(self.cfg.provider_timeout());
        let cache = RateCache::new(self.cfg.cache_ttl(), self.cfg.cache_max_entries);

        Ok(FxAvg {
            routes,
            fetcher,
            cache,
            metrics,
            cfg: self.cfg,
        })
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl FxAvg {
    /// Start building a new `FxAvg` instance.
    #[must_use]
    pub fn builder() -> FxAvgBuilder {
        FxAvgBuilder::new()
    }

    /// Snapshot of per-provider call counters, in registration order.
    #[must_use]
    pub fn metrics(&self) -> MetricsReport {
        self.metrics.snapshot()
    }

    /// The configuration this instance was built from.
    #[must_use]
    pub const fn config(&self) -> &FxAvgConfig {
        &self.cfg
    }

    /// Registered providers, in registration order.
    #[must_use]
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.cfg.providers
    }
}

impl std::fmt::Debug for FxAvg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FxAvg")
            .field("providers", &self.cfg.providers)
            .field("cache", &self.cache)
            .field("timeout", &self.fetcher.timeout())
            .field("mean_strategy", &self.cfg.mean_strategy)
            .finish_non_exhaustive()
    }
}
