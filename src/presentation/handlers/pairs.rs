use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::pairing::{SimilarPair, DEFAULT_TOP_K};
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PairsQuery {
    pub top_k: Option<usize>,
}

#[derive(Serialize)]
pub struct PairsResponse {
    pub pairs: Vec<SimilarPair>,
}

pub async fn pairs_handler(
    State(state): State<AppState>,
    Query(query): Query<PairsQuery>,
) -> Result<Json<PairsResponse>, ApiError> {
    let pairs = state
        .cohort
        .top_pairs(query.top_k.unwrap_or(DEFAULT_TOP_K))
        .await?;
    Ok(Json(PairsResponse { pairs }))
}
