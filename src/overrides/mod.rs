//! Override payload model and merge engine
//!
//! Forwarded payloads are built from up to three layers: the client request
//! body, router-level default overrides, and the profile of the worker the
//! request was routed to. Later layers win. Merging is shallow; nested
//! objects are replaced wholesale, never combined.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Failure simulation mode understood by the backend workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureMode {
    #[serde(rename = "All_Success")]
    AllSuccess,
    #[serde(rename = "All_fail")]
    AllFail,
    #[serde(rename = "percentage_fail")]
    PercentageFail,
}

/// One layer of a worker payload: the recognized control fields plus an
/// open set of passthrough fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideFields {
    /// Simulated processing latency in milliseconds.
    #[serde(
        rename = "PROCESSING_DELAY_MS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub processing_delay_ms: Option<u64>,

    /// Worker failure mode.
    #[serde(rename = "MODE", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FailureMode>,

    /// Failure percentage in [0, 100]; the worker clamps out-of-range values.
    #[serde(
        rename = "PERCENTAGE_FAIL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub percentage_fail: Option<u64>,

    /// Passthrough payload fields, forwarded untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OverrideFields {
    pub fn is_empty(&self) -> bool {
        self.processing_delay_ms.is_none()
            && self.mode.is_none()
            && self.percentage_fail.is_none()
            && self.extra.is_empty()
    }

    /// Apply `layer` on top of self, field by field.
    fn apply(&mut self, layer: &OverrideFields) {
        if let Some(delay) = layer.processing_delay_ms {
            self.processing_delay_ms = Some(delay);
        }
        if let Some(mode) = layer.mode {
            self.mode = Some(mode);
        }
        if let Some(percentage) = layer.percentage_fail {
            self.percentage_fail = Some(percentage);
        }
        for (key, value) in &layer.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Worker-specific overrides, matched by normalized URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    #[serde(default)]
    pub worker_url: String,
    #[serde(default)]
    pub overrides: Option<OverrideFields>,
}

/// Router-level override configuration carried in the request body under
/// the reserved `routerConfig` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterOverrides {
    #[serde(default)]
    pub default_overrides: Option<OverrideFields>,
    #[serde(default)]
    pub worker_profiles: Option<Vec<WorkerProfile>>,
}

/// Normalize a worker URL for identity comparison: trimmed, trailing
/// slashes stripped.
pub fn normalize_worker_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Find the overrides of the profile matching `worker_url`, if any.
/// Profiles with an empty URL never match; at most one profile applies.
pub fn profile_overrides<'a>(
    worker_url: &str,
    profiles: Option<&'a [WorkerProfile]>,
) -> Option<&'a OverrideFields> {
    let profiles = profiles?;
    let normalized = normalize_worker_url(worker_url);
    profiles
        .iter()
        .filter(|profile| !profile.worker_url.is_empty())
        .find(|profile| normalize_worker_url(&profile.worker_url) == normalized)
        .and_then(|profile| profile.overrides.as_ref())
}

/// Apply one override layer on top of a base payload.
///
/// An absent or empty layer returns the base untouched, so "nothing to
/// forward" survives the merge chain as `None`.
pub fn merge(base: Option<OverrideFields>, layer: Option<&OverrideFields>) -> Option<OverrideFields> {
    let Some(layer) = layer else {
        return base;
    };
    if layer.is_empty() {
        return base;
    }
    let mut merged = base.unwrap_or_default();
    merged.apply(layer);
    Some(merged)
}
