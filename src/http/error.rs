//! Error responses of the HTTP edge.

use crate::identity::services::IdentityError;
use crate::session::services::SessionError;
use crate::task::domain::TaskDomainError;
use crate::task::services::TaskLedgerError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned to HTTP clients as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing, or out-of-vocabulary input.
    #[error("{0}")]
    Validation(String),

    /// No live session.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller lacks the required role.
    #[error("{0}")]
    Forbidden(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// The entity still has dependent rows.
    #[error("{0}")]
    DependentRows(String),

    /// Storage failure or unexpected error; details are logged, not returned.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Validation, dependent rows: 400 Bad Request
    /// - Unauthorized: 401
    /// - Forbidden: 403
    /// - Not found: 404
    /// - Conflict: 409
    /// - Internal: 500
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DependentRows(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(err: &impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                "Internal server error".to_owned()
            }
            Self::Validation(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::DependentRows(message) => message,
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Domain(_) | IdentityError::SelfDeletion => {
                Self::Validation(err.to_string())
            }
            IdentityError::NameTaken(_) => Self::Conflict(err.to_string()),
            IdentityError::NotFound(_) => Self::NotFound("User not found".to_owned()),
            IdentityError::HasAssignedTasks { .. } => Self::DependentRows(err.to_string()),
            IdentityError::Repository(ref source) => Self::internal(source),
        }
    }
}

impl From<TaskLedgerError> for ApiError {
    fn from(err: TaskLedgerError) -> Self {
        match err {
            TaskLedgerError::Domain(_) | TaskLedgerError::UnknownAssignee(_) => {
                Self::Validation(err.to_string())
            }
            TaskLedgerError::NotFound(_) => Self::NotFound("Task not found".to_owned()),
            TaskLedgerError::Repository(ref source) => Self::internal(source),
            TaskLedgerError::Users(ref source) => Self::internal(source),
        }
    }
}

impl From<TaskDomainError> for ApiError {
    fn from(err: TaskDomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingName => Self::Validation(err.to_string()),
            SessionError::InvalidCredentials | SessionError::Unauthorized => {
                Self::Unauthorized(err.to_string())
            }
            SessionError::Forbidden => Self::Forbidden(err.to_string()),
            SessionError::Store(ref source) => Self::internal(source),
            SessionError::Lookup(ref source) => Self::internal(source),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
