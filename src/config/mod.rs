//! Configuration module for Magnetar
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`MAGNETAR_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use magnetar::config::MagnetarConfig;
//!
//! // Load defaults
//! let config = MagnetarConfig::default();
//! assert_eq!(config.server.port, 8787);
//!
//! // Parse from TOML
//! let toml = r#"
//! [pool]
//! workers = ["http://worker-a.example"]
//! "#;
//! let config: MagnetarConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.pool.workers.len(), 1);
//! ```

pub mod broker;
pub mod counter;
pub mod error;
pub mod learner;
pub mod logging;
pub mod pool;
pub mod server;

pub use broker::BrokerConfig;
pub use counter::CounterConfig;
pub use error::ConfigError;
pub use learner::LearnerConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use pool::PoolConfig;
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Magnetar router.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MagnetarConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Static worker pool
    pub pool: PoolConfig,
    /// External round-robin counter store
    pub counter: CounterConfig,
    /// Learner recommendation service
    pub learner: LearnerConfig,
    /// Telemetry/failure broker
    pub broker: BrokerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl MagnetarConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports MAGNETAR_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Server settings
        if let Ok(port) = std::env::var("MAGNETAR_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("MAGNETAR_HOST") {
            self.server.host = host;
        }

        // Worker pool (comma-separated URLs)
        if let Ok(workers) = std::env::var("MAGNETAR_WORKERS") {
            let parsed: Vec<String> = workers
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.pool.workers = parsed;
            }
        }

        // Side-channel endpoints
        if let Ok(url) = std::env::var("MAGNETAR_COUNTER_URL") {
            self.counter.url = Some(url);
        }
        if let Ok(token) = std::env::var("MAGNETAR_COUNTER_TOKEN") {
            self.counter.token = Some(token);
        }
        if let Ok(url) = std::env::var("MAGNETAR_LEARNER_URL") {
            self.learner.url = Some(url);
        }
        if let Ok(url) = std::env::var("MAGNETAR_BROKER_URL") {
            self.broker.url = Some(url);
        }

        // Logging settings
        if let Ok(level) = std::env::var("MAGNETAR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MAGNETAR_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// An empty worker pool is allowed here so the router can start and
    /// respond with a routing failure; individual entries must be usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        for (i, worker) in self.pool.workers.iter().enumerate() {
            if worker.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("pool.workers[{}]", i),
                    message: "URL cannot be empty".to_string(),
                });
            }
        }

        if self.counter.url.is_some() && self.counter.token.is_none() {
            return Err(ConfigError::Validation {
                field: "counter.token".to_string(),
                message: "token is required when counter.url is set".to_string(),
            });
        }

        if self.broker.telemetry_topic.is_empty() || self.broker.failures_topic.is_empty() {
            return Err(ConfigError::Validation {
                field: "broker".to_string(),
                message: "topic names cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
