//! fxavg-middleware
//!
//! Stateful pieces wrapped around the pure pipeline: the aggregated-result
//! cache and the per-provider call counters.

mod cache;
mod metrics;

pub use crate::cache::RateCache;
pub use crate::metrics::MetricsCollector;
