//! Magnetar - Stateless edge reverse proxy
//!
//! This library provides the core functionality for distributing inbound
//! HTTP requests across a statically configured pool of backend workers,
//! layering per-request and per-worker overrides into forwarded payloads,
//! and publishing routing telemetry to a downstream learning pipeline.

pub mod api;
pub mod cli;
pub mod config;
pub mod counter;
pub mod learner;
pub mod logging;
pub mod metrics;
pub mod overrides;
pub mod publish;
pub mod routing;
pub mod telemetry;
