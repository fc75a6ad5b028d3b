use axum::extract::State;
use axum::Json;

use crate::presentation::error::ApiError;
use crate::presentation::handlers::health::MessageResponse;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn refresh_cache_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let users = state.cohort.refresh_cache().await?;
    tracing::info!(users = users, "Cache refreshed on request");
    Ok(Json(MessageResponse {
        message: "Cache refreshed successfully".to_string(),
    }))
}
