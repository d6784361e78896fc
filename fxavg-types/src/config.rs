//! Configuration types shared across the orchestrator and connectors.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::FxError;

/// How request URLs are derived from a provider's configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderStyle {
    /// `{url}/latest?base=EUR&symbols=USD,GBP` with uppercase ISO codes.
    /// Responds with a top-level `rates` object.
    #[default]
    LatestQuery,
    /// `{url}/currencies/eur.json` with a lowercase base.
    /// Responds with an object keyed by the lowercase base currency.
    CurrencyFile,
}

impl ProviderStyle {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatestQuery => "latest-query",
            Self::CurrencyFile => "currency-file",
        }
    }
}

impl fmt::Display for ProviderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one upstream rate provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name used in metrics and logs.
    pub name: String,
    /// Base URL tried first.
    pub primary_url: String,
    /// Base URL tried when the primary attempt fails.
    #[serde(default)]
    pub fallback_url: Option<String>,
    /// URL layout and payload family of this provider.
    #[serde(default)]
    pub style: ProviderStyle,
}

impl ProviderConfig {
    /// Describe a provider without a fallback URL.
    pub fn new(name: impl Into<String>, primary_url: impl Into<String>, style: ProviderStyle) -> Self {
        Self {
            name: name.into(),
            primary_url: primary_url.into(),
            fallback_url: None,
            style,
        }
    }

    /// Attach a fallback base URL.
    #[must_use]
    pub fn with_fallback(mut self, fallback_url: impl Into<String>) -> Self {
        self.fallback_url = Some(fallback_url.into());
        self
    }
}

/// Divisor used when averaging per-currency sums across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeanStrategy {
    /// Divide every currency sum by the number of providers that returned any
    /// usable rate at all.
    #[default]
    ReportingProviders,
    /// Divide each currency sum by the number of providers that reported that
    /// particular currency.
    PerCurrency,
}

/// Global configuration for the `FxAvg` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FxAvgConfig {
    /// Providers queried on every cache miss, in reporting order.
    pub providers: Vec<ProviderConfig>,
    /// Lifetime of an aggregated result in milliseconds. `0` disables caching.
    pub cache_ttl_ms: u64,
    /// Upper bound on the number of cached queries.
    pub cache_max_entries: u64,
    /// Timeout applied to each individual HTTP attempt, in milliseconds.
    pub provider_timeout_ms: u64,
    /// Averaging divisor policy.
    pub mean_strategy: MeanStrategy,
}

impl Default for FxAvgConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            cache_ttl_ms: 60_000,
            cache_max_entries: 10_000,
            provider_timeout_ms: 5_000,
            mean_strategy: MeanStrategy::default(),
        }
    }
}

impl FxAvgConfig {
    /// Parse a configuration document in JSON form. Missing fields take their
    /// default values.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the document is not valid JSON or does not
    /// match the configuration shape.
    pub fn from_json_str(raw: &str) -> Result<Self, FxError> {
        serde_json::from_str(raw).map_err(|e| FxError::invalid_arg(format!("config: {e}")))
    }

    /// Cache time-to-live as a `Duration`.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Per-attempt provider timeout as a `Duration`.
    #[must_use]
    pub const fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}
