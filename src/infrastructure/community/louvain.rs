//! Louvain modularity optimization.
//!
//! Classic two-step loop: local moving of nodes between neighbouring
//! communities while modularity improves, then collapsing each community
//! into a single node and repeating on the smaller graph. Nodes are visited
//! in index order and ties keep the current community, so the same graph
//! always yields the same partition.

use crate::domain::ports::community_detector::{CommunityDetector, WeightedGraph};

const MAX_LEVELS: usize = 32;

pub struct LouvainDetector {
    max_passes: usize,
    min_gain: f64,
}

impl Default for LouvainDetector {
    fn default() -> Self {
        Self {
            max_passes: 64,
            min_gain: 1e-9,
        }
    }
}

impl LouvainDetector {
    /// Local moving phase. Returns each node's community label and whether
    /// any node moved.
    fn one_level(&self, graph: &WeightedGraph) -> (Vec<usize>, bool) {
        let n = graph.node_count();
        let mut community: Vec<usize> = (0..n).collect();
        let m2 = graph.total_weight();
        if m2 <= 0.0 {
            return (community, false);
        }

        let degree: Vec<f64> = (0..n).map(|i| graph.degree(i)).collect();
        let mut tot = degree.clone();
        let mut links = vec![0.0_f64; n];
        // Communities with `links[c] > 0` for the node being moved.
        let mut neighbours: Vec<usize> = Vec::new();
        let mut moved_any = false;

        for _ in 0..self.max_passes {
            let mut moved = false;
            for i in 0..n {
                let current = community[i];

                for &c in &neighbours {
                    links[c] = 0.0;
                }
                neighbours.clear();
                for j in 0..n {
                    let w = graph.weight(i, j);
                    if j == i || w <= 0.0 {
                        continue;
                    }
                    let c = community[j];
                    if links[c] == 0.0 {
                        neighbours.push(c);
                    }
                    links[c] += w;
                }
                // Ascending labels keep tie-breaking independent of visit order.
                neighbours.sort_unstable();

                tot[current] -= degree[i];
                let gain = |c: usize, tot: &[f64]| links[c] - tot[c] * degree[i] / m2;

                let mut best = current;
                let mut best_gain = gain(current, &tot);
                for &c in &neighbours {
                    if c == current {
                        continue;
                    }
                    let g = gain(c, &tot);
                    if g > best_gain + self.min_gain {
                        best = c;
                        best_gain = g;
                    }
                }

                tot[best] += degree[i];
                if best != current {
                    community[i] = best;
                    moved = true;
                    moved_any = true;
                }
            }
            if !moved {
                break;
            }
        }

        (community, moved_any)
    }
}

impl CommunityDetector for LouvainDetector {
    fn name(&self) -> &'static str {
        "louvain"
    }

    fn partition(&self, graph: &WeightedGraph) -> Vec<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        // Original node -> node of the current (collapsed) graph.
        let mut membership: Vec<usize> = (0..n).collect();
        let mut current = graph.clone();

        for level in 0..MAX_LEVELS {
            let (labels, moved) = self.one_level(&current);
            if !moved {
                break;
            }
            let (labels, count) = renumber(&labels);
            for m in membership.iter_mut() {
                *m = labels[*m];
            }
            tracing::trace!(level = level, communities = count, "Louvain level complete");
            if count == current.node_count() {
                break;
            }
            current = collapse(&current, &labels, count);
        }

        let (membership, count) = renumber(&membership);
        let mut communities = vec![Vec::new(); count];
        for (node, &c) in membership.iter().enumerate() {
            communities[c].push(node);
        }
        communities
    }
}

/// Relabels communities as `0..count` in order of first appearance.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping = vec![usize::MAX; labels.len()];
    let mut next = 0;
    let mut out = Vec::with_capacity(labels.len());
    for &label in labels {
        if mapping[label] == usize::MAX {
            mapping[label] = next;
            next += 1;
        }
        out.push(mapping[label]);
    }
    (out, next)
}

/// Builds the graph whose nodes are the communities of `graph`. Internal
/// weight becomes a self-loop.
fn collapse(graph: &WeightedGraph, labels: &[usize], count: usize) -> WeightedGraph {
    let n = graph.node_count();
    let mut collapsed = WeightedGraph::empty(count);
    for i in 0..n {
        for j in 0..n {
            let w = graph.weight(i, j);
            if w > 0.0 {
                collapsed.accumulate(labels[i], labels[j], w);
            }
        }
    }
    collapsed
}
