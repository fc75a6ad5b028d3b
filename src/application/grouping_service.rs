use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::application::embedding_cache::EmbeddingCache;
use crate::application::executor::GroupingExecutor;
use crate::application::grouping::GroupingEngine;
use crate::domain::entities::embedding_snapshot::EmbeddingSnapshot;
use crate::domain::entities::group::Group;
use crate::domain::entities::grouping_result::GroupingResult;
use crate::domain::error::DomainError;
use crate::domain::values::embedding::Embedding;
use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::check_dimensions;
use crate::domain::values::strategy_kind::StrategyKind;
use crate::domain::values::user_id::UserId;

/// Raw grouping request, validated by [`GroupingService::create_groups`].
#[derive(Debug, Clone)]
pub struct GroupingRequest {
    pub group_size: i64,
    pub strategy: String,
    /// Restrict grouping to these users. `None` or an empty list means
    /// every user with an embedding.
    pub user_ids: Option<Vec<UserId>>,
    pub seed: Option<u64>,
}

impl Default for GroupingRequest {
    fn default() -> Self {
        Self {
            group_size: GroupSize::default().value() as i64,
            strategy: StrategyKind::default().to_string(),
            user_ids: None,
            seed: None,
        }
    }
}

/// The users a request operates on: either the whole snapshot, shared, or
/// an owned subset of it.
enum Selection {
    All(Arc<EmbeddingSnapshot>),
    Subset(HashMap<UserId, Embedding>),
}

impl Selection {
    fn embeddings(&self) -> &HashMap<UserId, Embedding> {
        match self {
            Selection::All(snapshot) => &snapshot.embeddings,
            Selection::Subset(map) => map,
        }
    }

    fn len(&self) -> usize {
        self.embeddings().len()
    }
}

pub struct GroupingService {
    cache: Arc<EmbeddingCache>,
    engine: Arc<GroupingEngine>,
    executor: Arc<GroupingExecutor>,
}

impl GroupingService {
    pub fn new(
        cache: Arc<EmbeddingCache>,
        engine: Arc<GroupingEngine>,
        executor: Arc<GroupingExecutor>,
    ) -> Self {
        Self { cache, engine, executor }
    }

    pub async fn create_groups(&self, request: GroupingRequest) -> Result<GroupingResult, DomainError> {
        let request_time = Utc::now();
        let started = Instant::now();

        let size = GroupSize::new(request.group_size).map_err(DomainError::InvalidArgument)?;
        let kind: StrategyKind = request.strategy.parse().map_err(DomainError::InvalidArgument)?;

        let snapshot = self.cache.get_embeddings().await?;
        let selection = select_users(snapshot, request.user_ids.as_deref())?;
        let total_users = selection.len();
        let seed = request.seed.unwrap_or_else(rand::random);

        tracing::info!(
            group_size = size.value(),
            strategy = %kind,
            users = total_users,
            seed = seed,
            "Grouping request received"
        );

        let groups = if total_users == 0 {
            Vec::new()
        } else if total_users <= size.value() {
            let mut members: Vec<UserId> = selection.embeddings().keys().cloned().collect();
            members.sort();
            let embeddings = selection.embeddings();
            check_dimensions(members.iter().map(|id| (id, &embeddings[id])))?;
            vec![Group::new(members)]
        } else {
            let engine = Arc::clone(&self.engine);
            self.executor
                .run(move || engine.group(selection.embeddings(), size, kind, seed))
                .await??
        };

        let result = GroupingResult::new(request_time, kind, total_users, groups, started.elapsed(), seed);
        tracing::info!(
            groups = result.num_groups,
            execution_time_ms = result.execution_time_ms,
            "Grouping finished"
        );
        Ok(result)
    }

    /// Sorted ids of every user with an embedding.
    pub async fn list_users(&self) -> Result<Vec<UserId>, DomainError> {
        Ok(self.cache.get_embeddings().await?.user_ids())
    }

    /// Forces a cache reload and returns the number of users loaded.
    pub async fn refresh_cache(&self) -> Result<usize, DomainError> {
        Ok(self.cache.refresh().await?.len())
    }
}

fn select_users(
    snapshot: Arc<EmbeddingSnapshot>,
    requested: Option<&[UserId]>,
) -> Result<Selection, DomainError> {
    let requested = match requested {
        Some(ids) if !ids.is_empty() => ids,
        _ => return Ok(Selection::All(snapshot)),
    };

    let wanted: HashSet<&UserId> = requested.iter().collect();
    let subset: HashMap<UserId, Embedding> = wanted
        .iter()
        .filter_map(|id| {
            snapshot
                .embeddings
                .get(*id)
                .map(|e| ((*id).clone(), e.clone()))
        })
        .collect();

    if subset.len() < wanted.len() {
        let mut missing: Vec<&str> = wanted
            .iter()
            .filter(|id| !subset.contains_key(**id))
            .map(|id| id.as_str())
            .collect();
        missing.sort_unstable();
        tracing::warn!(missing = ?missing, "Some requested users don't have embeddings");
    }

    if subset.is_empty() {
        return Err(DomainError::NotFound(
            "None of the requested users have embeddings".to_string(),
        ));
    }
    Ok(Selection::Subset(subset))
}
