//! Routing algorithms for worker selection

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Routing algorithm determines how a worker is selected from the pool.
///
/// The serialized names are the wire protocol values accepted in request
/// bodies, query parameters, and the `x-magnetar-algo` header, and echoed
/// back in the `x-algo-used` response header. `proprietry` is a historical
/// spelling preserved for compatibility with deployed clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoutingAlgorithm {
    /// Rotate through the pool using the shared atomic counter
    #[default]
    #[serde(rename = "roundRobin")]
    RoundRobin,

    /// Uniformly random pool index
    #[serde(rename = "random")]
    Random,

    /// Ask the external learner for a recommendation, falling back to random
    #[serde(rename = "proprietry")]
    Learner,
}

impl RoutingAlgorithm {
    /// Wire name, suitable for headers and telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingAlgorithm::RoundRobin => "roundRobin",
            RoutingAlgorithm::Random => "random",
            RoutingAlgorithm::Learner => "proprietry",
        }
    }
}

impl FromStr for RoutingAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roundRobin" => Ok(RoutingAlgorithm::RoundRobin),
            "random" => Ok(RoutingAlgorithm::Random),
            "proprietry" => Ok(RoutingAlgorithm::Learner),
            _ => Err(format!("Unknown routing algorithm: {}", s)),
        }
    }
}

impl std::fmt::Display for RoutingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
