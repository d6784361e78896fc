//! Error, configuration, and report types shared across the fxavg workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod reports;

pub use config::{FxAvgConfig, MeanStrategy, ProviderConfig, ProviderStyle};
pub use error::FxError;
pub use reports::{ApiMetrics, MetricsReport};
