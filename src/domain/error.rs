use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Embedding store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Dimension mismatch for user {user_id}: expected {expected}, found {found}")]
    DimensionMismatch {
        user_id: String,
        expected: usize,
        found: usize,
    },

    #[error("Grouping timed out after {0} ms")]
    Timeout(u128),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::InvalidArgument(_) | DomainError::NotFound(_))
    }
}
