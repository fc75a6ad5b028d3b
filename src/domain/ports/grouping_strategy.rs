//! Grouping strategy port.
//!
//! Defines the [`GroupingStrategy`] trait implemented by every partitioning
//! algorithm, plus the leftover-handling rules the strategies share.
//!
//! # Overview
//!
//! Strategies work on matrix indices, never on user ids. The
//! [`SimilarityMatrix`] fixes one sorted ordering of the users, and every
//! tie a strategy breaks is broken by that ordering, so results are
//! reproducible for identical input.
//!
//! - Implement [`GroupingStrategy`] to add a new algorithm
//! - Return groups as `Vec<Vec<usize>>` of matrix indices
//! - Every index in `0..matrix.len()` must appear in exactly one group

use rand::RngCore;

use crate::domain::values::group_size::GroupSize;
use crate::domain::values::similarity::SimilarityMatrix;

/// Trait for user partitioning algorithms.
///
/// # Example
///
/// ```ignore
/// struct RoundRobin;
///
/// impl GroupingStrategy for RoundRobin {
///     fn name(&self) -> &'static str { "round_robin" }
///
///     fn partition(&self, matrix: &SimilarityMatrix, size: GroupSize, _rng: &mut dyn RngCore) -> Vec<Vec<usize>> {
///         (0..matrix.len()).collect::<Vec<_>>().chunks(size.value()).map(|c| c.to_vec()).collect()
///     }
/// }
/// ```
pub trait GroupingStrategy: Send + Sync {
    /// Unique name for this strategy.
    fn name(&self) -> &'static str;

    /// Partition all users of `matrix` into groups of `size`.
    ///
    /// `rng` is the only permitted source of randomness; deterministic
    /// strategies ignore it.
    fn partition(
        &self,
        matrix: &SimilarityMatrix,
        size: GroupSize,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec<usize>>;
}

/// Handles the cases every strategy resolves identically: no users yields
/// no groups, and `n <= k` yields one group holding everyone.
pub fn trivial_partition(n: usize, size: GroupSize) -> Option<Vec<Vec<usize>>> {
    if n == 0 {
        return Some(Vec::new());
    }
    if n <= size.value() {
        return Some(vec![(0..n).collect()]);
    }
    None
}

/// Shared leftover rule.
///
/// A remainder of at least `max(2, ⌈k/2⌉)` users becomes its own undersized
/// group. Smaller remainders are spread one user at a time into whichever
/// group currently has the fewest members, earliest group first on ties.
pub fn absorb_leftovers(groups: &mut Vec<Vec<usize>>, leftovers: Vec<usize>, size: GroupSize) {
    if leftovers.is_empty() {
        return;
    }
    if leftovers.len() >= size.min_remainder() || groups.is_empty() {
        groups.push(leftovers);
        return;
    }
    for user in leftovers {
        if let Some(smallest) = groups
            .iter_mut()
            .enumerate()
            .min_by_key(|(idx, g)| (g.len(), *idx))
            .map(|(_, g)| g)
        {
            smallest.push(user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(k: i64) -> GroupSize {
        GroupSize::new(k).unwrap()
    }

    #[test]
    fn test_trivial_cases() {
        assert_eq!(trivial_partition(0, size(3)), Some(vec![]));
        assert_eq!(trivial_partition(3, size(3)), Some(vec![vec![0, 1, 2]]));
        assert_eq!(trivial_partition(4, size(3)), None);
    }

    #[test]
    fn test_large_remainder_stands_alone() {
        let mut groups = vec![vec![0, 1, 2, 3, 4]];
        absorb_leftovers(&mut groups, vec![5, 6, 7], size(5));
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7]]);
    }

    #[test]
    fn test_small_remainder_spreads_to_smallest() {
        let mut groups = vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]];
        absorb_leftovers(&mut groups, vec![10, 11], size(5));
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4, 10], vec![5, 6, 7, 8, 9, 11]]);
    }

    #[test]
    fn test_single_leftover_never_alone_for_pairs() {
        let mut groups = vec![vec![0, 1], vec![2, 3]];
        absorb_leftovers(&mut groups, vec![4], size(2));
        assert_eq!(groups, vec![vec![0, 1, 4], vec![2, 3]]);
    }

    #[test]
    fn test_no_groups_keeps_remainder() {
        let mut groups = Vec::new();
        absorb_leftovers(&mut groups, vec![0], size(4));
        assert_eq!(groups, vec![vec![0]]);
    }
}
