//! fxavg-core
//!
//! Core types, traits, and pure functions shared across the fxavg workspace.
//!
//! - `types`: queries, cache keys, per-provider and aggregated rate sets.
//! - `transport`: the `Transport` seam for HTTP GETs and the `FetchObserver`
//!   hook used for call accounting.
//! - `fetcher`: primary/fallback fetching with a per-attempt timeout.
//! - `normalize` and `aggregate`: payload normalization and cross-provider
//!   averaging on `Decimal`.
//! - `endpoint`: request URL construction per provider style.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Timeouts are implemented with `tokio::time`, so fetching must run under a
//! Tokio 1.x runtime.
#![warn(missing_docs)]

/// Cross-provider averaging.
pub mod aggregate;
/// Provider request URL construction.
pub mod endpoint;
/// Primary/fallback fetching.
pub mod fetcher;
/// Raw payload normalization.
pub mod normalize;
/// Transport and observer traits.
pub mod transport;
pub mod types;

pub use aggregate::{aggregate, aggregate_with};
pub use fetcher::ProviderFetcher;
pub use normalize::normalize;
pub use transport::{FetchObserver, NoopObserver, Transport};
pub use types::*;

pub use fxavg_types::{
    ApiMetrics, FxAvgConfig, FxError, MeanStrategy, MetricsReport, ProviderConfig, ProviderStyle,
};
pub use rust_decimal::Decimal;
