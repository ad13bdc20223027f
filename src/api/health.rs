//! Liveness endpoint

use crate::api::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// GET /__magnetar/health - Report liveness and configured pool size.
pub async fn handle(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "workers": state.selector.pool_size(),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}
