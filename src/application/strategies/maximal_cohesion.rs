//! Maximal cohesion strategy.
//!
//! Grows one group at a time over the complete similarity graph. Each group
//! starts from an anchor and repeatedly absorbs the remaining user with the
//! highest average similarity to the members chosen so far.
//!
//! Anchor choice:
//! - first group: drawn from the caller's seeded random source
//! - later groups: the remaining user least similar, on average, to everyone
//!   already grouped, so strongly connected pairs are not all claimed by the
//!   earliest groups
//!
//! Running similarity sums per candidate keep every selection step linear in
//! the population size.

use rand::{Rng, RngCore};

use crate::domain::ports::grouping_strategy::{absorb_leftovers, trivial_partition, GroupingStrategy};
use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::SimilarityMatrix;

pub struct MaximalCohesionStrategy;

impl GroupingStrategy for MaximalCohesionStrategy {
    fn name(&self) -> &'static str {
        "maximal_cohesion"
    }

    fn partition(
        &self,
        matrix: &SimilarityMatrix,
        size: GroupSize,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec<usize>> {
        let n = matrix.len();
        if let Some(groups) = trivial_partition(n, size) {
            return groups;
        }
        let k = size.value();

        let mut pool = Pool::new(n);
        // Sum of similarity from each user to every user already grouped.
        let mut grouped_sum = vec![0.0_f64; n];
        let mut grouped_count = 0usize;
        let mut groups: Vec<Vec<usize>> = Vec::with_capacity(n / k + 1);

        while pool.len() >= k {
            let anchor = if groups.is_empty() {
                let members = pool.members();
                members[rng.gen_range(0..members.len())]
            } else {
                let count = grouped_count as f64;
                match pool.select(|u| -(grouped_sum[u] / count)) {
                    Some(u) => u,
                    None => break,
                }
            };

            let mut group = Vec::with_capacity(k);
            let mut member_sum = vec![0.0_f64; n];
            pool.take(anchor);
            add_member(matrix, &mut group, &mut member_sum, anchor);

            while group.len() < k {
                let len = group.len() as f64;
                let Some(best) = pool.select(|u| member_sum[u] / len) else {
                    break;
                };
                pool.take(best);
                add_member(matrix, &mut group, &mut member_sum, best);
            }

            for &member in &group {
                for (u, sum) in grouped_sum.iter_mut().enumerate() {
                    *sum += matrix.get(u, member);
                }
            }
            grouped_count += group.len();
            tracing::trace!(anchor = anchor, size = group.len(), "Cohesive group formed");
            groups.push(group);
        }

        absorb_leftovers(&mut groups, pool.members(), size);
        groups
    }
}

fn add_member(matrix: &SimilarityMatrix, group: &mut Vec<usize>, member_sum: &mut [f64], user: usize) {
    group.push(user);
    for (u, sum) in member_sum.iter_mut().enumerate() {
        *sum += matrix.get(u, user);
    }
}

/// Ungrouped users, tracked by membership flag to keep matrix order.
struct Pool {
    available: Vec<bool>,
    count: usize,
}

impl Pool {
    fn new(n: usize) -> Self {
        Self {
            available: vec![true; n],
            count: n,
        }
    }

    fn len(&self) -> usize {
        self.count
    }

    fn take(&mut self, user: usize) {
        if self.available[user] {
            self.available[user] = false;
            self.count -= 1;
        }
    }

    fn members(&self) -> Vec<usize> {
        self.available
            .iter()
            .enumerate()
            .filter(|(_, free)| **free)
            .map(|(u, _)| u)
            .collect()
    }

    /// Available user with the highest score; the earliest user wins ties.
    fn select(&self, mut score: impl FnMut(usize) -> f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (u, free) in self.available.iter().enumerate() {
            if !free {
                continue;
            }
            let s = score(u);
            match best {
                Some((_, best_score)) if s <= best_score => {}
                _ => best = Some((u, s)),
            }
        }
        best.map(|(u, _)| u)
    }
}
