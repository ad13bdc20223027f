//! # Metrics HTTP Handler
//!
//! Axum handler for the Prometheus exposition endpoint.

use crate::api::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Handler for GET /__magnetar/metrics (Prometheus text format).
///
/// Always returns 200 with the correct Content-Type for Prometheus
/// scrapers, even if no metrics have been recorded yet.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state.prometheus_handle.render();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics,
    )
}
