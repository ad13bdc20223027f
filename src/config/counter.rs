//! Round-robin counter store configuration

use serde::{Deserialize, Serialize};

/// Configuration for the external atomic counter backing round-robin
/// rotation.
///
/// When `url` and `token` are both set, the REST counter store is used so
/// that concurrent router instances agree on the rotation position. When
/// unset, a process-local counter is substituted; that is only correct for
/// single-instance deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Base URL of the Redis-compatible REST counter store.
    pub url: Option<String>,
    /// Bearer token for the counter store.
    pub token: Option<String>,
    /// Key holding the rotation counter.
    pub key: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            key: "roundRobin".to_string(),
        }
    }
}
