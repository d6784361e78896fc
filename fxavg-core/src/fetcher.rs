use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::FxError;
use crate::transport::{FetchObserver, NoopObserver, Transport};

/// Fetches one provider payload, falling back to a secondary URL once.
///
/// Failures never escape: a fetch whose attempts all fail yields `None`, so
/// callers can treat any subset of providers being down as missing data.
#[derive(Clone)]
pub struct ProviderFetcher {
    transport: Arc<dyn Transport>,
    observer: Arc<dyn FetchObserver>,
    timeout: Duration,
}

impl ProviderFetcher {
    /// Per-attempt timeout used unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a fetcher with the default timeout and no observer.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            observer: Arc::new(NoopObserver),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Report attempts and outcomes to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Override the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-attempt timeout in effect.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `primary_url`; on any failure GET `fallback_url` if present.
    ///
    /// Returns the first payload obtained, or `None` when every attempt failed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fxavg::core::fetch",
            skip(self),
            fields(timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)),
        )
    )]
    pub async fn fetch(&self, primary_url: &str, fallback_url: Option<&str>) -> Option<Value> {
        let payload = match self.attempt(primary_url).await {
            Ok(v) => Some(v),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(url = primary_url, error = %_e, "primary attempt failed");
                match fallback_url {
                    Some(fallback) => match self.attempt(fallback).await {
                        Ok(v) => Some(v),
                        Err(_e) => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(url = fallback, error = %_e, "fallback attempt failed");
                            None
                        }
                    },
                    None => None,
                }
            }
        };
        self.observer.on_outcome(primary_url, payload.is_some());
        payload
    }

    async fn attempt(&self, url: &str) -> Result<Value, FxError> {
        self.observer.on_attempt(url);
        (tokio::time::timeout(self.timeout, self.transport.get_json(url)).await)
            .unwrap_or_else(|_| Err(FxError::provider_timeout(url)))
    }
}
