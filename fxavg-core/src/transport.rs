use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::FxError;

/// Performs a single HTTP GET and decodes the body as JSON.
///
/// Implementations map every failure (connection, non-2xx status, undecodable
/// body) to an `FxError`; timeouts are applied by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return its JSON body.
    async fn get_json(&self, url: &str) -> Result<Value, FxError>;
}

impl dyn Transport {
    /// Build a `Transport` from a closure.
    pub fn from_fn<F>(f: F) -> Arc<dyn Transport>
    where
        F: Send + Sync + 'static + Fn(&str) -> Result<Value, FxError>,
    {
        struct FnTransport<F>(F);
        #[async_trait]
        impl<F> Transport for FnTransport<F>
        where
            F: Send + Sync + 'static + Fn(&str) -> Result<Value, FxError>,
        {
            async fn get_json(&self, url: &str) -> Result<Value, FxError> {
                (self.0)(url)
            }
        }
        Arc::new(FnTransport(f))
    }
}

/// Observer notified around each fetch.
///
/// `on_attempt` fires once per HTTP attempt (primary and fallback alike);
/// `on_outcome` fires once per fetch with the primary URL and whether any
/// attempt produced a payload.
pub trait FetchObserver: Send + Sync {
    /// An HTTP attempt against `url` is about to start.
    fn on_attempt(&self, url: &str);

    /// The fetch that started at `primary_url` has settled.
    fn on_outcome(&self, primary_url: &str, success: bool);
}

/// Observer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn on_attempt(&self, _url: &str) {}
    fn on_outcome(&self, _primary_url: &str, _success: bool) {}
}
