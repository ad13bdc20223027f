//! # Proxy API
//!
//! The HTTP surface of the router. Every inbound method and path is handled
//! by the catch-all forwarder; the only carve-outs are the reserved local
//! endpoints under `/__magnetar/`.
//!
//! ## Endpoints
//!
//! - `ANY /*` - Forward to a selected worker
//! - `GET /__magnetar/health` - Liveness and pool size
//! - `GET /__magnetar/metrics` - Prometheus exposition
//!
//! ## Example
//!
//! ```no_run
//! use magnetar::api::{create_router, AppState};
//! use magnetar::config::MagnetarConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(MagnetarConfig::default());
//! let state = Arc::new(AppState::new(config));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod error;
pub mod forward;
mod health;

pub use error::ClientError;

use crate::config::MagnetarConfig;
use crate::counter::{CounterStore, InMemoryCounter, RestCounter};
use crate::learner::LearnerClient;
use crate::publish::{BrokerClient, DeliveryMode, Dispatcher};
use crate::routing::Selector;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (10 MB).
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<MagnetarConfig>,
    pub http_client: reqwest::Client,
    pub selector: Selector,
    pub broker: BrokerClient,
    pub dispatcher: Dispatcher,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Prometheus handle for rendering metrics
    pub prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl AppState {
    /// Create new application state from the given configuration.
    pub fn new(config: Arc<MagnetarConfig>) -> Self {
        // Deadlines on the forward and learner calls are inherited from the
        // hosting environment, so the shared client sets none of its own.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client");

        let counter: Arc<dyn CounterStore> = match (&config.counter.url, &config.counter.token) {
            (Some(url), Some(token)) => {
                Arc::new(RestCounter::new(http_client.clone(), url, token))
            }
            _ => {
                tracing::warn!(
                    "No external counter store configured; round-robin rotation is process-local \
                     and will not agree across router instances"
                );
                Arc::new(InMemoryCounter::new())
            }
        };

        let learner = config
            .learner
            .url
            .as_deref()
            .map(|url| LearnerClient::new(http_client.clone(), url));

        let selector = Selector::new(
            config.pool.workers.clone(),
            counter,
            config.counter.key.clone(),
            learner,
        );

        let broker = BrokerClient::new(http_client.clone(), config.broker.url.clone());
        let delivery_mode = if config.broker.await_delivery {
            DeliveryMode::Await
        } else {
            DeliveryMode::Background
        };

        // Initialize metrics (safe to call multiple times - will reuse existing if already set)
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        Self {
            config,
            http_client,
            selector,
            broker,
            dispatcher: Dispatcher::new(delivery_mode),
            start_time: Instant::now(),
            prometheus_handle,
        }
    }
}

/// Create the proxy router with the catch-all forwarder and the reserved
/// local endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/__magnetar/health", get(health::handle))
        .route(
            "/__magnetar/metrics",
            get(crate::metrics::handler::metrics_handler),
        )
        .fallback(forward::handle)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
