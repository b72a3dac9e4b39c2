//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// The display text of every variant except `Database` and `Internal` is
/// sent to the client as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Field-level validation failures, already joined
    #[error("{0}")]
    Validation(String),

    #[error("An account with this email already exists.")]
    EmailTaken,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Incorrect email or password.")]
    InvalidCredentials,

    #[error("Current password is incorrect.")]
    CurrentPasswordIncorrect,

    #[error("New password must be different from the current password.")]
    SamePassword,

    /// Login attempt on a soft-deleted account
    #[error("Your account has been deactivated. Please contact support.")]
    AccountDeactivated,

    #[error("You are not logged in. Please log in to get access.")]
    NotLoggedIn,

    #[error("Your session has expired. Please log in again.")]
    TokenExpired,

    #[error("Invalid token. Please log in again.")]
    TokenInvalid,

    #[error("The user belonging to this token no longer exists.")]
    TokenUserGone,

    /// Valid token for a soft-deleted account
    #[error("Your account has been deactivated. Please contact support.")]
    TokenUserInactive,

    #[error("You recently changed your password. Please log in again.")]
    TokenStale,

    #[error("Refresh token not provided.")]
    RefreshTokenMissing,

    #[error("User not found or account deactivated.")]
    RefreshUserInvalid,

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("No user found with that ID.")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::SamePassword => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::CurrentPasswordIncorrect
            | AuthError::NotLoggedIn
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::TokenUserGone
            | AuthError::TokenUserInactive
            | AuthError::TokenStale
            | AuthError::RefreshTokenMissing
            | AuthError::RefreshUserInvalid => ErrorKind::Unauthorized,
            AuthError::AccountDeactivated | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::internal(msg),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials | AuthError::CurrentPasswordIncorrect => {
                tracing::warn!("Invalid credentials presented");
            }
            AuthError::TokenStale => {
                tracing::warn!("Token issued before password change");
            }
            AuthError::Forbidden => {
                tracing::warn!("Role check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
