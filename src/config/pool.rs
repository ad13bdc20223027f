//! Worker pool configuration

use serde::{Deserialize, Serialize};

/// Static worker pool definition.
///
/// The pool is an ordered sequence; selection algorithms index into it by
/// position, so the order in the configuration file is load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Backend worker base URLs, in rotation order.
    pub workers: Vec<String>,
}

impl PoolConfig {
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_defaults_empty() {
        let config = PoolConfig::default();
        assert!(config.is_empty());
        assert_eq!(config.len(), 0);
    }

    #[test]
    fn test_pool_preserves_order() {
        let config: PoolConfig = toml::from_str(
            r#"workers = ["http://w0.example", "http://w1.example", "http://w2.example"]"#,
        )
        .unwrap();
        assert_eq!(config.workers[0], "http://w0.example");
        assert_eq!(config.workers[2], "http://w2.example");
    }
}
