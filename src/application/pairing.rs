use std::sync::Arc;

use serde::Serialize;

use crate::application::embedding_cache::EmbeddingCache;
use crate::application::executor::GroupingExecutor;
use crate::domain::error::DomainError;
use crate::domain::values::similarity::SimilarityMatrix;
use crate::domain::values::user_id::UserId;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SimilarPair {
    pub user_a: UserId,
    pub user_b: UserId,
    pub similarity: f64,
}

/// Ranks user pairs by interest similarity.
pub struct PairingService {
    cache: Arc<EmbeddingCache>,
    executor: Arc<GroupingExecutor>,
}

impl PairingService {
    pub fn new(cache: Arc<EmbeddingCache>, executor: Arc<GroupingExecutor>) -> Self {
        Self { cache, executor }
    }

    /// The `top_k` most similar distinct pairs, best first. Ties keep the
    /// matrix ordering.
    pub async fn top_pairs(&self, top_k: usize) -> Result<Vec<SimilarPair>, DomainError> {
        if top_k == 0 {
            return Err(DomainError::InvalidArgument("top_k must be at least 1".to_string()));
        }
        let snapshot = self.cache.get_embeddings().await?;
        self.executor
            .run(move || -> Result<Vec<SimilarPair>, DomainError> {
                let matrix = SimilarityMatrix::build(&snapshot.embeddings)?;
                Ok(rank_pairs(&matrix, top_k))
            })
            .await?
    }
}

pub fn rank_pairs(matrix: &SimilarityMatrix, top_k: usize) -> Vec<SimilarPair> {
    let n = matrix.len();
    let mut pairs: Vec<(usize, usize, f64)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j, matrix.get(i, j)));
        }
    }
    pairs.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.0, a.1).cmp(&(b.0, b.1)))
    });
    pairs.truncate(top_k);

    pairs
        .into_iter()
        .map(|(i, j, similarity)| SimilarPair {
            user_a: matrix.id(i).clone(),
            user_b: matrix.id(j).clone(),
            similarity,
        })
        .collect()
}
