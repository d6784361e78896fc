use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the fxavg workspace.
///
/// Transport, status, decode, and timeout failures are produced per provider
/// attempt and absorbed by the fetcher. Only `InvalidArg` and
/// `NoDataAvailable` are expected to reach callers of `resolve`.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FxError {
    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The request could not be sent or the connection failed.
    #[error("transport error for {url}: {msg}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not a JSON document.
    #[error("malformed body from {url}: {msg}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message.
        msg: String,
    },

    /// A single attempt exceeded the configured provider timeout.
    #[error("provider timed out: {url}")]
    ProviderTimeout {
        /// Requested URL.
        url: String,
    },

    /// Every configured provider failed to return a payload.
    #[error("no exchange rate data available for {base}")]
    NoDataAvailable {
        /// Lowercased base currency of the failed query.
        base: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl FxError {
    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build a `Transport` error for a URL.
    pub fn transport(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error for a URL.
    pub fn decode(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(url: impl Into<String>) -> Self {
        Self::ProviderTimeout { url: url.into() }
    }

    /// Helper: build a `NoDataAvailable` error.
    pub fn no_data(base: impl Into<String>) -> Self {
        Self::NoDataAvailable { base: base.into() }
    }

    /// Returns true if this error is a per-attempt provider failure that the
    /// fetcher absorbs instead of surfacing.
    #[must_use]
    pub const fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Status { .. }
                | Self::Decode { .. }
                | Self::ProviderTimeout { .. }
        )
    }
}
