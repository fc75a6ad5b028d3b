//! Bulk import of embeddings from a JSON document of the form
//! `{"<user_id>": [f32, ...], ...}`.

use std::collections::HashMap;
use std::io::Read;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_store::EmbeddingSink;
use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub dimension: Option<usize>,
}

/// Parses and validates an import document. Every vector must be non-empty,
/// finite and share one dimension.
pub fn read_embeddings(reader: impl Read) -> Result<HashMap<UserId, Embedding>, DomainError> {
    let raw: HashMap<String, Vec<f32>> = serde_json::from_reader(reader)
        .map_err(|e| DomainError::InvalidArgument(format!("Invalid embeddings document: {e}")))?;

    let mut dimension: Option<usize> = None;
    for (id, vector) in &raw {
        if vector.is_empty() {
            return Err(DomainError::InvalidArgument(format!("Empty vector for user {id}")));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(DomainError::InvalidArgument(format!("Non-finite component for user {id}")));
        }
        match dimension {
            None => dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(DomainError::DimensionMismatch {
                    user_id: id.clone(),
                    expected,
                    found: vector.len(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(raw
        .into_iter()
        .map(|(id, vector)| (UserId::new(id), Embedding::new(vector)))
        .collect())
}

pub fn import_embeddings(sink: &dyn EmbeddingSink, reader: impl Read) -> Result<ImportSummary, DomainError> {
    let embeddings = read_embeddings(reader)?;
    let dimension = embeddings.values().next().map(|e| e.dimension());
    let imported = sink
        .upsert_all(&embeddings)
        .map_err(|e| DomainError::UpstreamUnavailable(e.to_string()))?;
    tracing::info!(imported = imported, dimension = ?dimension, "Embeddings imported");
    Ok(ImportSummary { imported, dimension })
}
