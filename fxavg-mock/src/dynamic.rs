use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fxavg_core::{FxError, Transport};
use serde_json::Value;
use tokio::sync::Mutex;

/// Instruction for how a GET should behave for matching URLs.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the provided payload.
    Return(Value),
    /// Fail with the provided error.
    Fail(FxError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    // Keyed by URL prefix; the longest matching prefix wins.
    rules: BTreeMap<String, MockBehavior>,
    delay: Option<Duration>,
    requests: Vec<String>,
}

impl InternalState {
    fn behavior_for(&self, url: &str) -> Option<MockBehavior> {
        self.rules
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, b)| b.clone())
    }
}

/// Controller handle used by tests to drive the mock transport from the outside.
#[derive(Clone)]
pub struct MockTransportController {
    state: Arc<Mutex<InternalState>>,
}

impl MockTransportController {
    /// Set the behavior for every URL starting with `prefix`.
    pub async fn set_behavior(&self, prefix: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(prefix.into(), behavior);
    }

    /// Delay every response by `delay` before applying its behavior.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().await.delay = delay;
    }

    /// Every URL requested so far, in request order.
    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }

    /// Number of requests made so far.
    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub async fn requests_to(&self, prefix: &str) -> usize {
        let guard = self.state.lock().await;
        guard
            .requests
            .iter()
            .filter(|u| u.starts_with(prefix))
            .count()
    }

    /// Clear all configured behaviors, the delay, and the request log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.delay = None;
        guard.requests.clear();
    }
}

/// A transport that defers all behavior to an external controller.
///
/// URLs with no matching rule fail with a 404 `Status` error.
pub struct MockTransport {
    state: Arc<Mutex<InternalState>>,
}

impl MockTransport {
    /// Create a new mock transport and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<dyn Transport>, MockTransportController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = MockTransportController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { state });
        (me as Arc<dyn Transport>, controller)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FxError> {
        // Snapshot behavior without holding the lock across await points
        let (behavior, delay) = {
            let mut guard = self.state.lock().await;
            guard.requests.push(url.to_string());
            (guard.behavior_for(url), guard.delay)
        };

        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        match behavior {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(FxError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
