//! Client-visible error responses
//!
//! The forwarder has exactly three terminal failure points; everything else
//! is side-channel and never surfaces to the client. The response bodies
//! are part of the deployed wire protocol.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Terminal, client-visible routing failures.
#[derive(Debug)]
pub enum ClientError {
    /// The request body claimed to be JSON but could not be parsed.
    InvalidJsonPayload,
    /// No worker could be selected (empty pool or unusable rotation state).
    NoWorkerAvailable,
    /// The chosen worker could not be reached at the network level.
    ForwardFailed { details: String },
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ClientError::InvalidJsonPayload => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid JSON payload"}),
            ),
            ClientError::NoWorkerAvailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "No worker url found"}),
            ),
            ClientError::ForwardFailed { details } => (
                StatusCode::BAD_GATEWAY,
                json!({"error": "Failed to forward request", "details": details}),
            ),
        };
        (status, Json(body)).into_response()
    }
}
