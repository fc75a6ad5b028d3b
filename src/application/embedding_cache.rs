//! Time-bounded cache in front of the embedding store.
//!
//! Readers clone an `Arc` of the live snapshot under a read lock and never
//! wait on each other. Reloads go through a single-flight gate: callers that
//! find the snapshot expired at the same time queue on the gate, and
//! whoever gets it second sees the outcome of the first fetch instead of
//! issuing another one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::embedding_snapshot::EmbeddingSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::embedding_store::EmbeddingStore;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Serve the expired snapshot when a mandatory reload fails. Off unless
    /// a deployment explicitly opts in; every use is logged.
    pub allow_stale_on_error: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            allow_stale_on_error: false,
        }
    }
}

#[derive(Default)]
struct RefreshGate {
    last_error: Option<String>,
}

pub struct EmbeddingCache {
    store: Arc<dyn EmbeddingStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    snapshot: RwLock<Option<Arc<EmbeddingSnapshot>>>,
    gate: Mutex<RefreshGate>,
    /// Completed fetch attempts, successful or not.
    attempts: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(store: Arc<dyn EmbeddingStore>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            store,
            clock,
            config,
            snapshot: RwLock::new(None),
            gate: Mutex::new(RefreshGate::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current snapshot, reloading it first if it is missing or older than
    /// the TTL.
    pub async fn get_embeddings(&self) -> Result<Arc<EmbeddingSnapshot>, DomainError> {
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }

        let observed = self.attempts.load(Ordering::SeqCst);
        let mut gate = self.gate.lock().await;

        // Someone else may have reloaded while we waited for the gate.
        if let Some(snapshot) = self.fresh().await {
            return Ok(snapshot);
        }
        if self.attempts.load(Ordering::SeqCst) != observed {
            if let Some(message) = gate.last_error.clone() {
                tracing::debug!("Reusing outcome of the failed in-flight fetch");
                return self.fallback(message).await;
            }
        }

        match self.fetch(&mut gate).await {
            Ok(snapshot) => Ok(snapshot),
            Err(DomainError::UpstreamUnavailable(message)) => self.fallback(message).await,
            Err(e) => Err(e),
        }
    }

    /// Unconditional reload. Failures always propagate.
    pub async fn refresh(&self) -> Result<Arc<EmbeddingSnapshot>, DomainError> {
        let mut gate = self.gate.lock().await;
        self.fetch(&mut gate).await
    }

    /// Live snapshot without triggering a reload, fresh or not.
    pub async fn current(&self) -> Option<Arc<EmbeddingSnapshot>> {
        self.snapshot.read().await.clone()
    }

    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.fetched_at)
    }

    async fn fresh(&self) -> Option<Arc<EmbeddingSnapshot>> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;
        let age = self.clock.now().saturating_duration_since(snapshot.loaded_at);
        if age < self.config.ttl {
            Some(Arc::clone(snapshot))
        } else {
            None
        }
    }

    /// Must be called with the gate held.
    async fn fetch(&self, gate: &mut RefreshGate) -> Result<Arc<EmbeddingSnapshot>, DomainError> {
        tracing::info!(store = self.store.name(), "Refreshing user embeddings cache");
        let result = self.store.load_all().await;
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match result {
            Ok(embeddings) => {
                let snapshot = Arc::new(EmbeddingSnapshot::new(embeddings, self.clock.now()));
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                gate.last_error = None;
                tracing::info!(users = snapshot.len(), "Loaded user embeddings");
                Ok(snapshot)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(store = self.store.name(), error = %message, "Error loading user embeddings");
                gate.last_error = Some(message.clone());
                Err(DomainError::UpstreamUnavailable(message))
            }
        }
    }

    async fn fallback(&self, message: String) -> Result<Arc<EmbeddingSnapshot>, DomainError> {
        if self.config.allow_stale_on_error {
            if let Some(stale) = self.current().await {
                tracing::warn!(
                    error = %message,
                    fetched_at = %stale.fetched_at,
                    "Serving stale embeddings after failed refresh"
                );
                return Ok(stale);
            }
        }
        Err(DomainError::UpstreamUnavailable(message))
    }
}
