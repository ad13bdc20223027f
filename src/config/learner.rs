//! Learner recommendation service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the external recommendation service consulted by the
/// learner-assisted selection algorithm. When `url` is unset the algorithm
/// degrades to random selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LearnerConfig {
    /// Base URL of the recommendation service.
    pub url: Option<String>,
}
