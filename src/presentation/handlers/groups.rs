use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::application::grouping_service::GroupingRequest;
use crate::domain::entities::grouping_result::GroupingResult;
use crate::domain::values::user_id::UserId;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GroupsRequest {
    #[serde(default = "default_group_size")]
    pub group_size: i64,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub user_ids: Option<Vec<UserId>>,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_group_size() -> i64 {
    GroupingRequest::default().group_size
}

fn default_strategy() -> String {
    GroupingRequest::default().strategy
}

impl From<GroupsRequest> for GroupingRequest {
    fn from(r: GroupsRequest) -> Self {
        GroupingRequest {
            group_size: r.group_size,
            strategy: r.strategy,
            user_ids: r.user_ids,
            seed: r.seed,
        }
    }
}

#[tracing::instrument(skip(state, payload))]
pub async fn groups_handler(
    State(state): State<AppState>,
    payload: Result<Json<GroupsRequest>, JsonRejection>,
) -> Result<Json<GroupingResult>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    tracing::debug!(
        group_size = request.group_size,
        strategy = %request.strategy,
        subset = request.user_ids.as_ref().map(|ids| ids.len()),
        "Processing grouping request"
    );
    let result = state.cohort.create_groups(request.into()).await?;
    Ok(Json(result))
}
