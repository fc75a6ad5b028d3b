//! Community detection port.
//!
//! Balanced grouping only needs *some* partition of the similarity graph into
//! dense regions; which algorithm produces it is an adapter concern. Callers
//! must not depend on the exact boundaries a detector returns, only on the
//! fact that every node appears in exactly one community.

/// Dense, undirected, non-negative weighted graph over nodes `0..n`.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    n: usize,
    weights: Vec<f64>,
}

impl WeightedGraph {
    /// Graph with `n` nodes and no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            weights: vec![0.0; n * n],
        }
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    /// Sets the symmetric edge weight between `a` and `b`. Negative weights
    /// are clamped to zero.
    pub fn set_edge(&mut self, a: usize, b: usize, weight: f64) {
        let w = weight.max(0.0);
        self.weights[a * self.n + b] = w;
        self.weights[b * self.n + a] = w;
    }

    /// Adds to the single adjacency entry `(a, b)`. Used when collapsing
    /// communities, where every ordered pair is visited, so the result stays
    /// symmetric.
    pub fn accumulate(&mut self, a: usize, b: usize, weight: f64) {
        self.weights[a * self.n + b] += weight.max(0.0);
    }

    pub fn weight(&self, a: usize, b: usize) -> f64 {
        self.weights[a * self.n + b]
    }

    /// Sum of edge weights incident to `node`, self-loop included.
    pub fn degree(&self, node: usize) -> f64 {
        self.weights[node * self.n..(node + 1) * self.n].iter().sum()
    }

    /// Sum of every adjacency entry (twice the total edge weight).
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Splits a weighted graph into communities.
pub trait CommunityDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns communities as lists of node indices. Every node of the graph
    /// appears in exactly one community.
    fn partition(&self, graph: &WeightedGraph) -> Vec<Vec<usize>>;
}
