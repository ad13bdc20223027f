//! Telemetry normalization
//!
//! Every forwarded request produces exactly one versioned telemetry record
//! for the learning pipeline. The record derives a success flag and a
//! numeric reward from the observed outcome; 4xx statuses deliberately
//! count as success, because the signal measures whether the backend was
//! reachable and answering, not whether the caller's request was valid.

pub mod failure;

pub use failure::{truncate_snippet, FailureRecord, SNIPPET_MAX_CHARS};

use crate::routing::RoutingAlgorithm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telemetry record schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Request-side context captured before routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryContext {
    pub request_id: String,
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub has_request_body: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<u64>,
}

/// The routing decision, immutable once computed for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub algo: RoutingAlgorithm,
    pub worker_url: String,
    pub target_url: String,
    /// Pool size at decision time.
    pub worker_count: usize,
}

/// Outcome as observed by the forwarder; `success` may be supplied
/// explicitly, otherwise it is derived from the status code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedOutcome {
    pub status_code: u16,
    pub latency_ms: u64,
    pub success: Option<bool>,
}

/// Normalized outcome carried by the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryOutcome {
    pub status_code: u16,
    pub latency_ms: u64,
    pub success: bool,
}

/// The normalized per-request record consumed by the learner and analytics
/// pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub version: u32,
    pub telemetry_id: String,
    pub captured_at: DateTime<Utc>,
    pub context: TelemetryContext,
    pub decision: RoutingDecision,
    pub outcome: TelemetryOutcome,
    pub reward: f64,
}

/// Input to [`collect`]. Id and timestamp are injectable so record
/// construction stays deterministic under test.
#[derive(Debug, Clone)]
pub struct TelemetryInput {
    pub context: TelemetryContext,
    pub decision: RoutingDecision,
    pub outcome: ObservedOutcome,
    pub reward: Option<f64>,
    pub telemetry_id: Option<String>,
    pub captured_at: Option<DateTime<Utc>>,
}

/// Derive the success flag: an explicit value wins, otherwise any status
/// below 500 counts (the backend answered).
pub fn derive_success(status_code: u16, provided: Option<bool>) -> bool {
    if let Some(success) = provided {
        return success;
    }
    (200..500).contains(&status_code)
}

/// Derive the reward: an explicit finite value wins, otherwise 1 for
/// success and 0 for failure.
pub fn derive_reward(success: bool, reward: Option<f64>) -> f64 {
    match reward {
        Some(value) if value.is_finite() => value,
        _ => {
            if success {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Build the normalized telemetry record. Pure given its inputs plus the
/// injected id/timestamp.
pub fn collect(input: TelemetryInput) -> TelemetryRecord {
    let telemetry_id = input
        .telemetry_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let captured_at = input.captured_at.unwrap_or_else(Utc::now);
    let success = derive_success(input.outcome.status_code, input.outcome.success);
    let reward = derive_reward(success, input.reward);

    TelemetryRecord {
        version: SCHEMA_VERSION,
        telemetry_id,
        captured_at,
        context: input.context,
        decision: input.decision,
        outcome: TelemetryOutcome {
            status_code: input.outcome.status_code,
            latency_ms: input.outcome.latency_ms,
            success,
        },
        reward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn context() -> TelemetryContext {
        TelemetryContext {
            request_id: "req-1".to_string(),
            method: "POST".to_string(),
            path: "/service".to_string(),
            query: None,
            client_id: Some("client-a".to_string()),
            has_request_body: true,
            payload_bytes: Some(42),
        }
    }

    fn decision() -> RoutingDecision {
        RoutingDecision {
            algo: RoutingAlgorithm::RoundRobin,
            worker_url: "https://w0.example".to_string(),
            target_url: "https://w0.example/service".to_string(),
            worker_count: 3,
        }
    }

    #[test]
    fn success_derivation() {
        assert!(derive_success(200, None));
        assert!(derive_success(404, None));
        assert!(!derive_success(500, None));
        assert!(!derive_success(503, None));
        // An explicit flag always wins.
        assert!(!derive_success(200, Some(false)));
        assert!(derive_success(500, Some(true)));
    }

    #[test]
    fn reward_derivation() {
        assert_eq!(derive_reward(true, None), 1.0);
        assert_eq!(derive_reward(false, None), 0.0);
        assert_eq!(derive_reward(false, Some(0.5)), 0.5);
        // Non-finite explicit rewards fall back to the derived value.
        assert_eq!(derive_reward(true, Some(f64::NAN)), 1.0);
        assert_eq!(derive_reward(false, Some(f64::INFINITY)), 0.0);
    }

    #[test]
    fn collect_is_deterministic_with_injected_id_and_timestamp() {
        let captured_at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let input = TelemetryInput {
            context: context(),
            decision: decision(),
            outcome: ObservedOutcome {
                status_code: 200,
                latency_ms: 18,
                success: None,
            },
            reward: None,
            telemetry_id: Some("telemetry-1".to_string()),
            captured_at: Some(captured_at),
        };

        let first = collect(input.clone());
        let second = collect(input);
        assert_eq!(first, second);
        assert_eq!(first.version, SCHEMA_VERSION);
        assert_eq!(first.telemetry_id, "telemetry-1");
        assert_eq!(first.captured_at, captured_at);
        assert!(first.outcome.success);
        assert_eq!(first.reward, 1.0);
    }

    #[test]
    fn collect_generates_id_and_timestamp_when_absent() {
        let input = TelemetryInput {
            context: context(),
            decision: decision(),
            outcome: ObservedOutcome {
                status_code: 502,
                latency_ms: 5,
                success: None,
            },
            reward: None,
            telemetry_id: None,
            captured_at: None,
        };

        let record = collect(input);
        assert!(!record.telemetry_id.is_empty());
        assert!(!record.outcome.success);
        assert_eq!(record.reward, 0.0);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let record = collect(TelemetryInput {
            context: context(),
            decision: decision(),
            outcome: ObservedOutcome {
                status_code: 200,
                latency_ms: 18,
                success: None,
            },
            reward: None,
            telemetry_id: Some("telemetry-1".to_string()),
            captured_at: Some(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()),
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["telemetryId"], "telemetry-1");
        assert_eq!(json["decision"]["workerUrl"], "https://w0.example");
        assert_eq!(json["decision"]["algo"], "roundRobin");
        assert_eq!(json["outcome"]["statusCode"], 200);
        assert_eq!(json["context"]["hasRequestBody"], true);
    }
}
