use crate::domain::error::DomainError;
use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use rayon::prelude::*;
use std::collections::HashMap;

/// Cosine similarity of two equal-length vectors, accumulated in f64.
///
/// Returns `None` when either vector has zero or non-finite norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if is_degenerate_norm(norm_a) || is_degenerate_norm(norm_b) || !dot.is_finite() {
        return None;
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Zero, NaN and infinite norms all make cosine similarity meaningless.
fn is_degenerate_norm(norm: f64) -> bool {
    norm == 0.0 || !norm.is_finite()
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum()
}

/// Fails on the first vector whose dimension differs from the first one
/// yielded. Callers pass ids in sorted order so the reported user is stable.
pub fn check_dimensions<'a>(
    mut entries: impl Iterator<Item = (&'a UserId, &'a Embedding)>,
) -> Result<(), DomainError> {
    let Some((_, first)) = entries.next() else {
        return Ok(());
    };
    let expected = first.dimension();
    for (id, v) in entries {
        if v.dimension() != expected {
            return Err(DomainError::DimensionMismatch {
                user_id: id.to_string(),
                expected,
                found: v.dimension(),
            });
        }
    }
    Ok(())
}

/// A zero-norm or non-finite embedding found while building the matrix.
/// Tolerated: all of its similarities are recorded as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegenerateVector {
    pub user_id: UserId,
}

/// Symmetric pairwise cosine similarity over a fixed, sorted ordering of
/// user ids.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    ids: Vec<UserId>,
    index: HashMap<UserId, usize>,
    values: Vec<f64>,
    degenerate: Vec<DegenerateVector>,
}

impl SimilarityMatrix {
    pub fn build(embeddings: &HashMap<UserId, Embedding>) -> Result<Self, DomainError> {
        let mut ids: Vec<UserId> = embeddings.keys().cloned().collect();
        ids.sort();
        let n = ids.len();

        let vectors: Vec<&Embedding> = ids.iter().map(|id| &embeddings[id]).collect();
        check_dimensions(ids.iter().zip(vectors.iter().copied()))?;

        let norms: Vec<f64> = vectors.iter().map(|v| v.norm()).collect();
        let degenerate: Vec<DegenerateVector> = ids
            .iter()
            .zip(norms.iter())
            .filter(|(_, norm)| is_degenerate_norm(**norm))
            .map(|(id, _)| DegenerateVector {
                user_id: id.clone(),
            })
            .collect();
        for d in &degenerate {
            tracing::warn!(
                user_id = %d.user_id,
                "Degenerate vector: zero or non-finite norm, similarity treated as 0"
            );
        }

        let mut values = vec![0.0_f64; n * n];
        if n > 0 {
            values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = if is_degenerate_norm(norms[i]) || is_degenerate_norm(norms[j]) {
                        0.0
                    } else if i == j {
                        1.0
                    } else {
                        let sim = dot(vectors[i].as_slice(), vectors[j].as_slice())
                            / (norms[i] * norms[j]);
                        sim.clamp(-1.0, 1.0)
                    };
                }
            });
        }

        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        tracing::debug!(users = n, degenerate = degenerate.len(), "Similarity matrix built");

        Ok(Self {
            ids,
            index,
            values,
            degenerate,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    pub fn id(&self, i: usize) -> &UserId {
        &self.ids[i]
    }

    pub fn index_of(&self, id: &UserId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ids.len() + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.ids.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Sum of similarities between `i` and each of `members`.
    pub fn sum_to(&self, i: usize, members: &[usize]) -> f64 {
        let row = self.row(i);
        members.iter().map(|&m| row[m]).sum()
    }

    /// Mean similarity between `i` and `members`; 0 for an empty set.
    pub fn average_to(&self, i: usize, members: &[usize]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        self.sum_to(i, members) / members.len() as f64
    }

    pub fn degenerate(&self) -> &[DegenerateVector] {
        &self.degenerate
    }
}
