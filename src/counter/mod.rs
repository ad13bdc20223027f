//! Shared atomic counter backing round-robin rotation
//!
//! Round-robin position must not live in a single process's memory: any
//! number of concurrent router instances have to agree on it. The store is
//! modeled as one operation, atomic increment-and-return, so rotation never
//! degenerates into a read-then-write race.

pub mod rest;

pub use rest::RestCounter;

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

/// Errors from the counter store.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("counter store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed counter response: {0}")]
    Malformed(String),
}

/// A keyed integer counter supporting atomic increment-and-return.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter at `key` and return the
    /// post-increment value, in a single round trip.
    async fn increment(&self, key: &str) -> Result<i64, CounterError>;
}

/// Process-local counter for single-instance deployments and tests.
///
/// Tracks one logical counter regardless of key; the router only ever uses
/// the single rotation key. Multi-instance deployments need [`RestCounter`]
/// instead, since separate processes would otherwise rotate independently.
#[derive(Debug, Default)]
pub struct InMemoryCounter {
    value: AtomicI64,
}

impl InMemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary value, e.g. to exercise negative counter
    /// states in tests.
    pub fn starting_at(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounter {
    async fn increment(&self, _key: &str) -> Result<i64, CounterError> {
        Ok(self.value.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
