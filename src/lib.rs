pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use crate::application::embedding_cache::{CacheConfig, EmbeddingCache};
use crate::application::executor::GroupingExecutor;
use crate::application::grouping::GroupingEngine;
use crate::application::grouping_service::{GroupingRequest, GroupingService};
use crate::application::pairing::{PairingService, SimilarPair};
use crate::config::{Settings, StoreKind};
use crate::domain::entities::grouping_result::GroupingResult;
use crate::domain::error::DomainError;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::embedding_store::EmbeddingStore;
use crate::domain::values::user_id::UserId;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::community::louvain::LouvainDetector;
use crate::infrastructure::sqlite::embedding_store::SqliteEmbeddingStore;
use crate::infrastructure::stores::http::HttpEmbeddingStore;
use crate::infrastructure::stores::memory::InMemoryEmbeddingStore;
use std::sync::Arc;

pub struct Cohort {
    cache: Arc<EmbeddingCache>,
    grouping: GroupingService,
    pairing: PairingService,
}

impl Cohort {
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        let store: Arc<dyn EmbeddingStore> = match settings.store {
            StoreKind::Sqlite => Arc::new(
                SqliteEmbeddingStore::open(&settings.db_path)
                    .map_err(|e| DomainError::UpstreamUnavailable(e.to_string()))?,
            ),
            StoreKind::Http => {
                let url = settings.store_url.clone().ok_or_else(|| {
                    DomainError::InvalidArgument("COHORT_STORE_URL is required for the http store".to_string())
                })?;
                Arc::new(
                    HttpEmbeddingStore::new(url, settings.store_api_key.clone(), settings.request_timeout())
                        .map_err(|e| DomainError::UpstreamUnavailable(e.to_string()))?,
                )
            }
            StoreKind::Memory => Arc::new(InMemoryEmbeddingStore::default()),
        };

        tracing::info!(store = %settings.store, ttl_secs = settings.cache_ttl_secs, "Embedding store configured");
        Self::with_store(store, settings)
    }

    pub fn with_store(store: Arc<dyn EmbeddingStore>, settings: &Settings) -> Result<Self, DomainError> {
        Self::with_parts(store, Arc::new(SystemClock), settings)
    }

    pub fn with_parts(
        store: Arc<dyn EmbeddingStore>,
        clock: Arc<dyn Clock>,
        settings: &Settings,
    ) -> Result<Self, DomainError> {
        if settings.allow_stale {
            tracing::warn!("Stale embeddings will be served when a refresh fails");
        }
        let cache = Arc::new(EmbeddingCache::new(
            store,
            clock,
            CacheConfig {
                ttl: settings.cache_ttl(),
                allow_stale_on_error: settings.allow_stale,
            },
        ));
        let executor = Arc::new(GroupingExecutor::new(settings.workers, settings.request_timeout())?);
        let engine = Arc::new(GroupingEngine::new(Arc::new(LouvainDetector::default())));

        Ok(Self {
            grouping: GroupingService::new(Arc::clone(&cache), engine, Arc::clone(&executor)),
            pairing: PairingService::new(Arc::clone(&cache), executor),
            cache,
        })
    }

    // Delegating methods
    pub async fn create_groups(&self, request: GroupingRequest) -> Result<GroupingResult, DomainError> {
        self.grouping.create_groups(request).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserId>, DomainError> {
        self.grouping.list_users().await
    }

    pub async fn refresh_cache(&self) -> Result<usize, DomainError> {
        self.grouping.refresh_cache().await
    }

    pub async fn top_pairs(&self, top_k: usize) -> Result<Vec<SimilarPair>, DomainError> {
        self.pairing.top_pairs(top_k).await
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}
