//! fxavg-http
//!
//! [`HttpTransport`] implements `fxavg_core::Transport` on top of a shared
//! `reqwest::Client`. Each GET maps its failures onto `FxError`:
//!
//! - connection and request errors become `Transport`;
//! - non-2xx responses become `Status`;
//! - bodies that are not JSON become `Decode`.
//!
//! Timeouts are not applied here; the fetcher wraps every attempt in its own
//! per-attempt deadline.
#![warn(missing_docs)]

use async_trait::async_trait;
use fxavg_core::{FxError, Transport};
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;

/// User agent sent with every request unless a custom client is supplied.
pub const USER_AGENT: &str = concat!("fxavg/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by a single `reqwest::Client`.
///
/// `reqwest::Client` is `Clone + Send + Sync` and pools connections
/// internally, so one transport is shared across all providers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a fresh client that ignores system proxies.
    ///
    /// # Errors
    /// Returns `Other` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FxError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FxError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fxavg::http::get_json", skip(self), err)
    )]
    async fn get_json(&self, url: &str) -> Result<Value, FxError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| FxError::transport(url, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FxError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FxError::transport(url, e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FxError::decode(url, e.to_string()))
    }
}
