//! fxavg averages exchange rates across several independent providers.
//!
//! Overview
//! - Each configured provider is queried concurrently; a provider whose primary
//!   URL fails is retried once against its fallback URL.
//! - Payloads are normalized to the requested symbols and averaged on
//!   `Decimal`, rounded half-up to six places.
//! - Results are cached per canonical `(base, sorted symbols)` key for a fixed
//!   TTL; concurrent misses on the same key share one fan-out.
//! - Per-provider call counters are kept alongside and exposed through
//!   [`FxAvg::metrics`].
//!
//! Key behaviors and trade-offs
//! - Partial failure degrades the average: providers that return nothing are
//!   left out of the mean instead of failing the request.
//! - Total failure (no provider produced any payload) is an error and is not
//!   cached, so the next call tries the network again.
//! - Mean divisor: `ReportingProviders` divides by the number of providers that
//!   contributed anything; `PerCurrency` divides by the number that reported
//!   each currency.
//!
//! Examples
//! ```rust,ignore
//! use fxavg::{FxAvg, ProviderConfig, ProviderStyle};
//!
//! let fx = FxAvg::builder()
//!     .with_provider(ProviderConfig::new(
//!         "frankfurter",
//!         "https://api.frankfurter.app",
//!         ProviderStyle::LatestQuery,
//!     ))
//!     .with_provider(
//!         ProviderConfig::new(
//!             "currency-api",
//!             "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1",
//!             ProviderStyle::CurrencyFile,
//!         )
//!         .with_fallback("https://latest.currency-api.pages.dev/v1"),
//!     )
//!     .build()?;
//!
//! let rates = fx.resolve("NZD", &["USD", "EUR"]).await?;
//! println!("{:?}", rates.rate("usd"));
//! println!("{}", serde_json::to_string(&fx.metrics())?);
//! ```
//!
//! Async runtime (Tokio)
//! ---------------------
//! `resolve` relies on `tokio::time` for per-attempt timeouts and must run
//! under a Tokio 1.x runtime.

mod core;
mod resolve;

pub use crate::core::{FxAvg, FxAvgBuilder};

pub use fxavg_core::{
    AggregatedRates, ApiMetrics, CacheKey, Decimal, FetchObserver, FxAvgConfig, FxError,
    MeanStrategy, MetricsReport, ProviderConfig, ProviderResult, ProviderStyle, RateMap,
    RateQuery, Transport,
};
pub use fxavg_http::HttpTransport;
