//! Shared helpers for integration tests.

use axum::body::Body;
use futures::StreamExt;
use magnetar::api::{create_router, AppState};
use magnetar::config::MagnetarConfig;
use std::sync::Arc;

/// Build a config with the given worker pool.
///
/// Publishes are awaited before the response so tests can assert on broker
/// state deterministically.
pub fn make_config(workers: Vec<String>) -> MagnetarConfig {
    let mut config = MagnetarConfig::default();
    config.pool.workers = workers;
    config.broker.await_delivery = true;
    config
}

/// Build the proxy app from a config.
pub fn make_app(config: MagnetarConfig) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(config)));
    create_router(state)
}

/// Read a response body to a string.
pub async fn body_to_string(body: Body) -> String {
    let mut body_stream = body.into_data_stream();
    let mut result = String::new();
    while let Some(chunk) = body_stream.next().await {
        if let Ok(bytes) = chunk {
            result.push_str(&String::from_utf8_lossy(&bytes));
        }
    }
    result
}
