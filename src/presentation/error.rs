use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::error::DomainError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP face of [`DomainError`].
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(DomainError::InvalidArgument(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DomainError::UpstreamUnavailable(_)
            | DomainError::DimensionMismatch { .. }
            | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        let error = match &self.0 {
            DomainError::InvalidArgument(msg) | DomainError::NotFound(msg) => msg.clone(),
            DomainError::UpstreamUnavailable(msg) => format!("Failed to load user embeddings: {msg}"),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
