//! Failure records for 5xx upstream responses
//!
//! Emitted to a dedicated topic so operators and the learner can inspect
//! intentional and unintentional worker failures without replaying traffic.

use crate::routing::RoutingAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the captured response body snippet, in characters.
pub const SNIPPET_MAX_CHARS: usize = 2048;

/// Diagnostic record for an upstream 5xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub failure_id: String,
    pub captured_at: DateTime<Utc>,
    pub worker_url: String,
    pub target_url: String,
    pub original_url: String,
    pub method: String,
    pub algo: RoutingAlgorithm,
    pub response_status: u16,
    pub response_status_text: String,
    /// JSON payload that was forwarded to the worker, when one was built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_body: Option<String>,
    /// Leading slice of the upstream response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_snippet: Option<String>,
}

/// Truncate a response body to the snippet limit, on a character boundary.
pub fn truncate_snippet(body: &str) -> String {
    body.chars().take(SNIPPET_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_snippet("Failed"), "Failed");
        assert_eq!(truncate_snippet(""), "");
    }

    #[test]
    fn long_bodies_are_truncated_to_the_limit() {
        let body = "x".repeat(SNIPPET_MAX_CHARS + 500);
        let snippet = truncate_snippet(&body);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let body = "é".repeat(SNIPPET_MAX_CHARS + 1);
        let snippet = truncate_snippet(&body);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let record = FailureRecord {
            failure_id: "failure-1".to_string(),
            captured_at: Utc::now(),
            worker_url: "https://w0.example".to_string(),
            target_url: "https://w0.example/service".to_string(),
            original_url: "/service?algo=roundRobin".to_string(),
            method: "POST".to_string(),
            algo: RoutingAlgorithm::RoundRobin,
            response_status: 503,
            response_status_text: "Service Unavailable".to_string(),
            forwarded_body: None,
            response_snippet: Some("Failed".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["failureId"], "failure-1");
        assert_eq!(json["responseStatus"], 503);
        assert_eq!(json["responseSnippet"], "Failed");
        assert!(json.get("forwardedBody").is_none());
    }
}
