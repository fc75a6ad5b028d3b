//! Greedy anchor strategy.
//!
//! Takes the first remaining user as an anchor and surrounds it with the
//! `k - 1` remaining users most similar to it. Cheap and fully deterministic,
//! but later groups get whatever the earlier anchors left behind.

use rand::RngCore;

use crate::domain::ports::grouping_strategy::{absorb_leftovers, trivial_partition, GroupingStrategy};
use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::SimilarityMatrix;

pub struct GreedyStrategy;

impl GroupingStrategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn partition(
        &self,
        matrix: &SimilarityMatrix,
        size: GroupSize,
        _rng: &mut dyn RngCore,
    ) -> Vec<Vec<usize>> {
        let n = matrix.len();
        if let Some(groups) = trivial_partition(n, size) {
            return groups;
        }
        let k = size.value();

        // Kept in matrix order so "first remaining" and tie-breaks follow it.
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut groups = Vec::with_capacity(n / k + 1);

        while remaining.len() >= k {
            let anchor = remaining[0];
            let row = matrix.row(anchor);

            let mut candidates: Vec<usize> = remaining[1..].to_vec();
            candidates.sort_by(|&a, &b| {
                row[b]
                    .partial_cmp(&row[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.cmp(&b))
            });

            let mut group = Vec::with_capacity(k);
            group.push(anchor);
            group.extend_from_slice(&candidates[..k - 1]);

            remaining.retain(|u| !group.contains(u));
            groups.push(group);
        }

        absorb_leftovers(&mut groups, remaining, size);
        groups
    }
}
