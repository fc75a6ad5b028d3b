//! Grouping engine: similarity matrix plus strategy dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::strategies::StrategySet;
use crate::domain::entities::group::Group;
use crate::domain::error::DomainError;
use crate::domain::ports::community_detector::CommunityDetector;
use crate::domain::values::embedding::Embedding;
use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::SimilarityMatrix;
use crate::domain::values::strategy_kind::StrategyKind;
use crate::domain::values::user_id::UserId;

pub struct GroupingEngine {
    strategies: StrategySet,
}

impl GroupingEngine {
    pub fn new(detector: Arc<dyn CommunityDetector>) -> Self {
        Self {
            strategies: StrategySet::new(detector),
        }
    }

    /// Partitions every user in `embeddings` into groups of `size`.
    ///
    /// `seed` feeds the strategy's random source; the same input, strategy
    /// and seed always produce the same groups.
    pub fn group(
        &self,
        embeddings: &HashMap<UserId, Embedding>,
        size: GroupSize,
        kind: StrategyKind,
        seed: u64,
    ) -> Result<Vec<Group>, DomainError> {
        let matrix = SimilarityMatrix::build(embeddings)?;
        let strategy = self.strategies.get(kind);
        let mut rng = StdRng::seed_from_u64(seed);

        let partition = strategy.partition(&matrix, size, &mut rng);
        debug_assert!(
            is_complete_partition(&partition, matrix.len()),
            "{} produced an incomplete partition",
            strategy.name()
        );

        tracing::debug!(
            strategy = strategy.name(),
            users = matrix.len(),
            groups = partition.len(),
            "Partition complete"
        );

        Ok(partition
            .into_iter()
            .map(|members| Group::new(members.into_iter().map(|i| matrix.id(i).clone()).collect()))
            .collect())
    }
}

/// True when every index in `0..n` appears in exactly one group.
pub fn is_complete_partition(groups: &[Vec<usize>], n: usize) -> bool {
    let mut seen = vec![false; n];
    for &member in groups.iter().flatten() {
        if member >= n || seen[member] {
            return false;
        }
        seen[member] = true;
    }
    seen.into_iter().all(|s| s)
}
