//! Message broker configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Kafka REST broker receiving telemetry and failure
/// records. When `url` is unset, publishes are skipped with a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Base URL of the Kafka REST produce endpoint.
    pub url: Option<String>,
    /// Topic receiving per-request telemetry records.
    pub telemetry_topic: String,
    /// Topic receiving 5xx failure records.
    pub failures_topic: String,
    /// Await broker delivery before returning the client response instead
    /// of publishing in the background. Trades response latency for
    /// delivery certainty.
    pub await_delivery: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: None,
            telemetry_topic: "telemetry".to_string(),
            failures_topic: "failures".to_string(),
            await_delivery: false,
        }
    }
}
