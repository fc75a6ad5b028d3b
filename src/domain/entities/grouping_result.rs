use crate::domain::entities::group::Group;
use crate::domain::values::strategy_kind::StrategyKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct GroupingResult {
    pub request_time: DateTime<Utc>,
    pub total_users: usize,
    pub num_groups: usize,
    pub groups: Vec<Group>,
    /// Group size → number of groups with that size.
    pub group_sizes: BTreeMap<usize, usize>,
    pub strategy_used: StrategyKind,
    pub execution_time_ms: f64,
    /// Seed handed to the strategy's random source.
    pub seed: u64,
}

impl GroupingResult {
    pub fn new(
        request_time: DateTime<Utc>,
        strategy: StrategyKind,
        total_users: usize,
        groups: Vec<Group>,
        elapsed: Duration,
        seed: u64,
    ) -> Self {
        let group_sizes = size_distribution(&groups);
        Self {
            request_time,
            total_users,
            num_groups: groups.len(),
            groups,
            group_sizes,
            strategy_used: strategy,
            execution_time_ms: elapsed.as_secs_f64() * 1000.0,
            seed,
        }
    }
}

pub fn size_distribution(groups: &[Group]) -> BTreeMap<usize, usize> {
    let mut sizes = BTreeMap::new();
    for group in groups {
        *sizes.entry(group.len()).or_insert(0) += 1;
    }
    sizes
}
