use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed payload: {0}")]
    Decode(String),
}

/// Upstream source of interest embeddings.
///
/// A single bulk read returns every user that currently holds an embedding.
/// Users without one are simply absent from the map, never an error.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Short adapter name for logs (e.g., "sqlite", "http").
    fn name(&self) -> &str;

    async fn load_all(&self) -> Result<HashMap<UserId, Embedding>, StoreError>;
}

/// Writable side of a store, used by bulk imports.
pub trait EmbeddingSink: Send + Sync {
    /// Inserts or replaces every embedding in one batch. Returns the number
    /// written.
    fn upsert_all(&self, embeddings: &HashMap<UserId, Embedding>) -> Result<usize, StoreError>;
}
