//! Domain-level error types.

use thiserror::Error;

/// Errors surfaced by the publish workflow.
///
/// Every terminal failure of a publish call maps onto exactly one of these
/// kinds; the HTTP layer translates them into status codes without inspecting
/// messages.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The call arrived without a proven identity. Over HTTP the bearer-token
    /// extractor rejects such requests before the workflow runs; this variant
    /// is the workflow-level expression for any other embedding.
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid {field}: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    #[error("Record not found")]
    NotFound,

    #[error("Not allowed to modify this record")]
    PermissionDenied,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PublishError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for PublishError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => PublishError::NotFound,
            other => PublishError::Internal(other.to_string()),
        }
    }
}
