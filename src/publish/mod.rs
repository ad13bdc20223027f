//! Best-effort record publishing
//!
//! Telemetry and failure records are produced to a Kafka REST endpoint
//! strictly after the client response has been built. The broker client
//! raises on rejection so its caller can log the loss; the dispatcher
//! decides whether that happens in the background (default) or inline when
//! delivery certainty was configured over latency.

use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

const KAFKA_ACCEPT: &str = "application/vnd.kafka.v2+json";
const KAFKA_CONTENT_TYPE: &str = "application/vnd.kafka.json.v2+json";

/// Errors from producing to the broker.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("broker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("broker responded with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Normalize a base URL and topic name into the REST produce endpoint.
pub fn topic_url(base_url: &str, topic: &str) -> String {
    format!("{}/topics/{}", base_url.trim_end_matches('/'), topic)
}

#[derive(Debug, Serialize)]
struct ProduceRecord<'a, T: Serialize> {
    key: &'a str,
    value: &'a T,
}

#[derive(Debug, Serialize)]
struct ProducePayload<'a, T: Serialize> {
    records: Vec<ProduceRecord<'a, T>>,
}

/// Client for the Kafka REST produce endpoint. An unconfigured broker is a
/// supported deployment mode, not an error: produces become logged no-ops.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl BrokerClient {
    pub fn new(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Produce a single-record batch to `topic`.
    pub async fn produce<T: Serialize>(
        &self,
        topic: &str,
        key: &str,
        value: &T,
    ) -> Result<(), PublishError> {
        let Some(base_url) = &self.base_url else {
            warn!(topic, "Broker URL is not configured; skipping publish");
            return Ok(());
        };

        let payload = ProducePayload {
            records: vec![ProduceRecord { key, value }],
        };

        let response = self
            .client
            .post(topic_url(base_url, topic))
            .header(reqwest::header::ACCEPT, KAFKA_ACCEPT)
            .header(reqwest::header::CONTENT_TYPE, KAFKA_CONTENT_TYPE)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// How record publication relates to the client response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Publish on a background task; the response never waits.
    #[default]
    Background,
    /// Await the publish before returning the response.
    Await,
}

/// Submits publish work strictly after the response has been constructed.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    mode: DeliveryMode,
}

impl Dispatcher {
    pub fn new(mode: DeliveryMode) -> Self {
        Self { mode }
    }

    /// Run `task` according to the configured delivery mode. In background
    /// mode the task is detached onto the runtime with a best-effort
    /// completion window; in await mode it completes before this returns.
    pub async fn submit<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.mode {
            DeliveryMode::Background => {
                tokio::spawn(task);
            }
            DeliveryMode::Await => task.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn topic_url_normalizes_trailing_slash() {
        assert_eq!(
            topic_url("https://broker.example/", "telemetry"),
            "https://broker.example/topics/telemetry"
        );
        assert_eq!(
            topic_url("https://broker.example", "failures"),
            "https://broker.example/topics/failures"
        );
    }

    #[tokio::test]
    async fn produce_posts_single_record_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/topics/telemetry"))
            .and(header("content-type", KAFKA_CONTENT_TYPE))
            .and(header("accept", KAFKA_ACCEPT))
            .and(body_partial_json(serde_json::json!({
                "records": [{"key": "record-1", "value": {"reward": 1.0}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "offsets": [{"partition": 0, "offset": 12, "error_code": null, "error": null}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let broker = BrokerClient::new(reqwest::Client::new(), Some(server.uri()));
        broker
            .produce("telemetry", "record-1", &serde_json::json!({"reward": 1.0}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn produce_without_base_url_is_a_noop() {
        let broker = BrokerClient::new(reqwest::Client::new(), None);
        assert!(!broker.is_configured());
        broker
            .produce("telemetry", "record-1", &serde_json::json!({}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn produce_raises_on_broker_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad record"))
            .mount(&server)
            .await;

        let broker = BrokerClient::new(reqwest::Client::new(), Some(server.uri()));
        let error = broker
            .produce("telemetry", "record-1", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(error, PublishError::Rejected { status: 422, .. }));
    }

    #[tokio::test]
    async fn await_mode_completes_before_submit_returns() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        let dispatcher = Dispatcher::new(DeliveryMode::Await);
        dispatcher
            .submit(async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;

        assert!(done.load(Ordering::SeqCst));
    }
}
