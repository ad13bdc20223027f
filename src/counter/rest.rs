//! REST counter store client
//!
//! Speaks the Redis-compatible REST protocol used by serverless key-value
//! stores: `POST {base}/incr/{key}` with a bearer token, responding with
//! `{"result": <post-increment value>}`. The INCR primitive is what makes
//! the rotation safe under concurrent router instances.

use super::{CounterError, CounterStore};
use async_trait::async_trait;
use serde::Deserialize;

/// Client for an HTTP-fronted atomic counter.
pub struct RestCounter {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct IncrResponse {
    result: i64,
}

impl RestCounter {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl CounterStore for RestCounter {
    async fn increment(&self, key: &str) -> Result<i64, CounterError> {
        let url = format!("{}/incr/{}", self.base_url, key);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CounterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: IncrResponse = response
            .json()
            .await
            .map_err(|e| CounterError::Malformed(e.to_string()))?;
        Ok(payload.result)
    }
}
