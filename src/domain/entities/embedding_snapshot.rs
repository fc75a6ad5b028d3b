use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Instant;

/// One complete bulk read from the embedding store.
///
/// Snapshots are immutable once built; the cache swaps whole snapshots.
#[derive(Debug)]
pub struct EmbeddingSnapshot {
    pub embeddings: HashMap<UserId, Embedding>,
    /// Monotonic load time, used for TTL checks.
    pub loaded_at: Instant,
    pub fetched_at: DateTime<Utc>,
}

impl EmbeddingSnapshot {
    pub fn new(embeddings: HashMap<UserId, Embedding>, loaded_at: Instant) -> Self {
        Self {
            embeddings,
            loaded_at,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// All user ids, sorted.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.embeddings.keys().cloned().collect();
        ids.sort();
        ids
    }
}
