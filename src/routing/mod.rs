//! Worker selection
//!
//! The selector picks a worker URL from the configured pool using the
//! requested algorithm. Selection itself never fails loudly: an empty pool
//! or an unusable counter yields `None`, which the forwarder surfaces as a
//! terminal routing failure.

pub mod algorithm;

pub use algorithm::RoutingAlgorithm;

use crate::counter::CounterStore;
use crate::learner::{LearnerClient, LearnerContext};
use std::sync::Arc;

/// Selects a worker per request from an immutable pool.
pub struct Selector {
    /// Ordered worker URLs; algorithms index by position.
    pool: Vec<String>,

    /// Shared rotation counter.
    counter: Arc<dyn CounterStore>,

    /// Key of the rotation counter.
    counter_key: String,

    /// Recommendation client; absent when no learner is configured.
    learner: Option<LearnerClient>,
}

impl Selector {
    pub fn new(
        pool: Vec<String>,
        counter: Arc<dyn CounterStore>,
        counter_key: String,
        learner: Option<LearnerClient>,
    ) -> Self {
        Self {
            pool,
            counter,
            counter_key,
            learner,
        }
    }

    /// Pool size at decision time.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Select a worker URL for this request, or `None` when no worker can
    /// be chosen (empty pool, or rotation state unavailable).
    pub async fn select_worker(
        &self,
        algorithm: RoutingAlgorithm,
        context: Option<&LearnerContext<'_>>,
    ) -> Option<String> {
        if self.pool.is_empty() {
            return None;
        }

        match algorithm {
            RoutingAlgorithm::RoundRobin => self.select_round_robin().await,
            RoutingAlgorithm::Random => Some(self.select_random()),
            RoutingAlgorithm::Learner => Some(self.select_learner(context).await),
        }
    }

    /// One atomic increment-and-return round trip, then index into the
    /// pool. A read-then-write sequence would lose updates under
    /// concurrency, so the counter value is never fetched separately.
    async fn select_round_robin(&self) -> Option<String> {
        let total = self.pool.len() as i64;
        let counter = match self.counter.increment(&self.counter_key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "Counter increment failed; round-robin selection unavailable");
                return None;
            }
        };

        // Double modulo keeps the index in range even if the stored counter
        // was reset to a negative value.
        let index = ((counter - 1) % total + total) % total;
        Some(self.pool[index as usize].clone())
    }

    /// Uniform random pool index.
    fn select_random(&self) -> String {
        use std::collections::hash_map::RandomState;
        use std::hash::BuildHasher;

        let random_state = RandomState::new();
        let random_value = random_state.hash_one(std::time::SystemTime::now());
        let index = (random_value as usize) % self.pool.len();
        self.pool[index].clone()
    }

    /// Learner-assisted selection. Only consulted when both a learner and a
    /// request context are present; every failure mode degrades to random.
    async fn select_learner(&self, context: Option<&LearnerContext<'_>>) -> String {
        if let (Some(learner), Some(context)) = (&self.learner, context) {
            if let Some(worker_url) = learner.recommend(context).await {
                return worker_url;
            }
            tracing::warn!("No learner recommendation; falling back to random selection");
        }
        self.select_random()
    }
}
