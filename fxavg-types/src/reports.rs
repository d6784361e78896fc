use serde::{Deserialize, Serialize};

/// Call counters for a single configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    /// Provider name as configured.
    pub name: String,
    /// HTTP attempts made, primary and fallback combined.
    pub total_requests: u64,
    /// Fetches that ended with a usable payload.
    pub successful_requests: u64,
    /// Fetches where both primary and fallback failed.
    pub failed_requests: u64,
}

/// Snapshot of all provider counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// One entry per configured provider, in configuration order.
    pub apis: Vec<ApiMetrics>,
}

impl MetricsReport {
    /// Look up the counters of a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ApiMetrics> {
        self.apis.iter().find(|a| a.name == name)
    }
}
