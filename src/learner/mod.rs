//! Learner recommendation client
//!
//! The learner is an external service that watches the telemetry stream and
//! recommends a worker per request. Its failure modes must never surface:
//! every error path here logs a warning and yields no recommendation, which
//! the selector turns into a random pick.

use serde::Deserialize;
use tracing::warn;

/// Request context forwarded to the recommendation endpoint.
#[derive(Debug, Clone, Copy)]
pub struct LearnerContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub request_id: &'a str,
}

/// Response body of `GET /recommendation`. Score details are ignored; only
/// the recommended URL matters to the router.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationResponse {
    #[serde(default)]
    worker_url: Option<String>,
}

/// Client for the learner recommendation service.
#[derive(Debug, Clone)]
pub struct LearnerClient {
    client: reqwest::Client,
    base_url: String,
}

impl LearnerClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the learner for a worker recommendation.
    ///
    /// Returns `None` on any non-success status, transport error, malformed
    /// body, or empty recommendation.
    pub async fn recommend(&self, context: &LearnerContext<'_>) -> Option<String> {
        let mut request = self
            .client
            .get(format!("{}/recommendation", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .header("x-request-id", context.request_id)
            .query(&[("path", context.path)]);
        if let Some(query) = context.query {
            request = request.query(&[("query", query)]);
        }
        request = request.query(&[("requestId", context.request_id)]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "Failed to contact learner");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Learner recommendation request failed");
            return None;
        }

        match response.json::<RecommendationResponse>().await {
            Ok(payload) => {
                let worker_url = payload.worker_url?;
                let worker_url = worker_url.trim();
                if worker_url.is_empty() {
                    None
                } else {
                    Some(worker_url.to_string())
                }
            }
            Err(error) => {
                warn!(%error, "Malformed learner recommendation");
                None
            }
        }
    }
}
