//! # Metrics Collection Module
//!
//! Prometheus metrics for the router, exposed at `/__magnetar/metrics`.
//!
//! **Counters:**
//! - `magnetar_requests_total{algo, status}` - Forwarded requests
//! - `magnetar_routing_failures_total{reason}` - Terminal routing failures
//! - `magnetar_publish_failures_total{topic}` - Lost telemetry/failure records
//!
//! **Histograms:**
//! - `magnetar_upstream_latency_seconds{algo}` - Upstream round-trip latency

pub mod handler;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter with custom histogram buckets.
///
/// Buckets are tuned for proxy hop latencies (milliseconds to a few
/// seconds, plus the worker's simulated processing delay).
///
/// Returns a PrometheusHandle that can be used to render metrics.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let latency_buckets = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("magnetar_upstream_latency_seconds".to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
