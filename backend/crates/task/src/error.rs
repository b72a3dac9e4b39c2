//! Task Error Types
//!
//! Task-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Task-specific result type alias
pub type TaskResult<T> = Result<T, TaskError>;

/// Task-specific error variants
#[derive(Debug, Error)]
pub enum TaskError {
    /// Field-level validation failures, already joined
    #[error("{0}")]
    Validation(String),

    #[error("Invalid task ID")]
    InvalidTaskId,

    /// Unknown id, or a task owned by someone else
    #[error("No task found with that ID.")]
    NotFound,

    #[error("Provide a status query param for bulk delete.")]
    BulkStatusMissing,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Validation(_) | TaskError::InvalidTaskId | TaskError::BulkStatusMissing => {
                ErrorKind::BadRequest
            }
            TaskError::NotFound => ErrorKind::NotFound,
            TaskError::Database(_) | TaskError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            TaskError::Database(e) => AppError::from(e),
            TaskError::Internal(msg) => AppError::internal(msg),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            TaskError::Database(e) => {
                tracing::error!(error = %e, "Task database error");
            }
            TaskError::Internal(msg) => {
                tracing::error!(message = %msg, "Task internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Task request rejected");
            }
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for TaskError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            TaskError::Validation(err.message().to_string())
        } else {
            TaskError::Internal(err.to_string())
        }
    }
}
