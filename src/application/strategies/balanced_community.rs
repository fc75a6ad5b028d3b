//! Balanced community strategy.
//!
//! Three phases:
//!
//! 1. Run community detection over the similarity graph (weights scaled up
//!    to sharpen the detector's resolution, negatives dropped).
//! 2. Rebalance: oversized communities are cut into consecutive chunks of
//!    `k`, mid-sized ones are kept whole, small ones are dissolved into an
//!    ungrouped pool.
//! 3. Drain the pool into groups of `k`; the final remainder either becomes
//!    its own group or is spread over the groups it fits best.
//!
//! Exact community boundaries depend on the detector. Only the structural
//! guarantees (every user in exactly one group, sizes within bounds) are
//! relied upon.

use std::collections::HashSet;
use std::sync::Arc;

use rand::RngCore;

use crate::domain::ports::community_detector::{CommunityDetector, WeightedGraph};
use crate::domain::ports::grouping_strategy::{trivial_partition, GroupingStrategy};
use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::SimilarityMatrix;

const WEIGHT_SCALE: f64 = 10.0;

pub struct BalancedCommunityStrategy {
    detector: Arc<dyn CommunityDetector>,
}

impl BalancedCommunityStrategy {
    pub fn new(detector: Arc<dyn CommunityDetector>) -> Self {
        Self { detector }
    }

    fn build_graph(&self, matrix: &SimilarityMatrix) -> WeightedGraph {
        let n = matrix.len();
        let mut graph = WeightedGraph::empty(n);
        for i in 0..n {
            for j in (i + 1)..n {
                graph.set_edge(i, j, matrix.get(i, j) * WEIGHT_SCALE);
            }
        }
        graph
    }
}

impl GroupingStrategy for BalancedCommunityStrategy {
    fn name(&self) -> &'static str {
        "balanced_groups"
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
        let keep_min = size.min_remainder();

        let graph = self.build_graph(matrix);
        let communities = normalize_communities(self.detector.partition(&graph), n);
        tracing::debug!(
            detector = self.detector.name(),
            communities = communities.len(),
            "Community detection finished"
        );

        // Phase 2: rebalance
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut ungrouped: Vec<usize> = Vec::new();
        for community in communities {
            if community.len() > k {
                for chunk in community.chunks(k) {
                    if chunk.len() == k {
                        groups.push(chunk.to_vec());
                    } else {
                        ungrouped.extend_from_slice(chunk);
                    }
                }
            } else if community.len() >= keep_min {
                groups.push(community);
            } else {
                ungrouped.extend(community);
            }
        }

        // Phase 3: drain the pool
        let mut rest = ungrouped.as_slice();
        while rest.len() >= k {
            groups.push(rest[..k].to_vec());
            rest = &rest[k..];
        }

        if !rest.is_empty() {
            if rest.len() >= keep_min || groups.is_empty() {
                groups.push(rest.to_vec());
            } else {
                for &user in rest {
                    let target = best_fit(matrix, &groups, user, k);
                    groups[target].push(user);
                }
            }
        }

        groups
    }
}

/// Index of the group `user` joins: the highest average similarity among
/// groups not yet oversized (size <= k), earliest on ties. Falls back to the
/// smallest group when every group is oversized.
fn best_fit(matrix: &SimilarityMatrix, groups: &[Vec<usize>], user: usize, k: usize) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (idx, group) in groups.iter().enumerate() {
        if group.len() > k {
            continue;
        }
        let avg = matrix.average_to(user, group);
        match best {
            Some((_, best_avg)) if avg <= best_avg => {}
            _ => best = Some((idx, avg)),
        }
    }
    match best {
        Some((idx, _)) => idx,
        None => groups
            .iter()
            .enumerate()
            .min_by_key(|(idx, g)| (g.len(), *idx))
            .map(|(idx, _)| idx)
            .unwrap_or(0),
    }
}

/// Makes detector output safe to rebalance: drops out-of-range and duplicate
/// nodes, adds any node the detector skipped as a singleton, sorts members,
/// and orders communities by their first member.
fn normalize_communities(raw: Vec<Vec<usize>>, n: usize) -> Vec<Vec<usize>> {
    let mut seen = HashSet::with_capacity(n);
    let mut communities: Vec<Vec<usize>> = raw
        .into_iter()
        .map(|community| {
            let mut members: Vec<usize> = community
                .into_iter()
                .filter(|&u| u < n && seen.insert(u))
                .collect();
            members.sort_unstable();
            members
        })
        .filter(|c| !c.is_empty())
        .collect();

    let missing: Vec<usize> = (0..n).filter(|u| !seen.contains(u)).collect();
    if !missing.is_empty() {
        tracing::warn!(missing = missing.len(), "Detector skipped nodes; treating them as singletons");
        communities.extend(missing.into_iter().map(|u| vec![u]));
    }

    communities.sort_by_key(|c| c[0]);
    communities
}
