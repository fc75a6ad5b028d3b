use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::domain::values::user_id::UserId;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UsersResponse {
    pub total_users: usize,
    pub user_ids: Vec<UserId>,
}

pub async fn users_handler(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let user_ids = state.cohort.list_users().await?;
    Ok(Json(UsersResponse {
        total_users: user_ids.len(),
        user_ids,
    }))
}
