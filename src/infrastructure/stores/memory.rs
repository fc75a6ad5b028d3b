use crate::domain::ports::embedding_store::{EmbeddingStore, StoreError};
use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-process embedding store. Counts bulk reads and can be switched into a
/// failing mode, which makes it the store of choice for demos and tests.
#[derive(Default)]
pub struct InMemoryEmbeddingStore {
    embeddings: RwLock<HashMap<UserId, Embedding>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryEmbeddingStore {
    pub fn new(embeddings: HashMap<UserId, Embedding>) -> Self {
        Self {
            embeddings: RwLock::new(embeddings),
            ..Default::default()
        }
    }

    pub fn insert(&self, user_id: UserId, embedding: Embedding) {
        if let Ok(mut map) = self.embeddings.write() {
            map.insert(user_id, embedding);
        }
    }

    /// Number of completed or failed `load_all` calls.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingStore for InMemoryEmbeddingStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_all(&self) -> Result<HashMap<UserId, Embedding>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("in-memory store set to fail".to_string()));
        }
        self.embeddings
            .read()
            .map(|map| map.clone())
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}
