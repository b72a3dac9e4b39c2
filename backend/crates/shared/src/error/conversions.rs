//! Error conversions - From implementations for common error types
//!
//! Store-level and framework-level failures are translated here so that the
//! HTTP boundary only ever sees [`AppError`].

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Invalid id format").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("Invalid JSON body: {}", err)).with_source(err)
        } else {
            AppError::unexpected(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL の SQLSTATE を [`ErrorKind`] に分類
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
#[cfg(feature = "sqlx")]
pub fn classify_pg_code(code: &str) -> Option<(ErrorKind, &'static str)> {
    match code {
        // Class 23 — Integrity Constraint Violation
        "23505" => Some((ErrorKind::Conflict, "Duplicate field value. Please use another value.")),
        "23503" => Some((ErrorKind::Conflict, "Referenced record does not exist")),
        "23502" => Some((ErrorKind::BadRequest, "Required field is missing")),
        "23514" => Some((ErrorKind::BadRequest, "Invalid input data")),
        // Class 22 — Data Exception
        "22P02" => Some((ErrorKind::BadRequest, "Invalid id format")),
        "22001" => Some((ErrorKind::BadRequest, "Value too long")),
        // Class 53 / 57 — resources, operator intervention
        "53000" | "53100" | "53200" | "53300" | "57P01" | "57P02" | "57P03" => {
            Some((ErrorKind::ServiceUnavailable, "Database unavailable"))
        }
        _ => None,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                let classified = db_err.code().and_then(|code| classify_pg_code(code.as_ref()));
                match classified {
                    Some((kind, message)) => AppError::new(kind, message).with_source(err),
                    None => AppError::unexpected(err),
                }
            }
            _ => AppError::unexpected(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
mod axum_impls {
    use axum::Json;
    use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};

    use super::AppError;

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            AppError::bad_request(rejection.body_text())
        }
    }

    impl From<QueryRejection> for AppError {
        fn from(rejection: QueryRejection) -> Self {
            AppError::bad_request(rejection.body_text())
        }
    }

    impl From<PathRejection> for AppError {
        fn from(rejection: PathRejection) -> Self {
            AppError::bad_request(rejection.body_text())
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            if !self.is_operational() {
                tracing::error!(error = ?self, "Unexpected error");
            }

            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            // RFC 7807 Problem Details for HTTP APIs
            let body = serde_json::json!({
                "type": format!("https://httpstatuses.io/{}", self.status_code()),
                "title": self.kind().as_str(),
                "status": self.status_code(),
                "detail": self.public_message(),
                "action": self.action(),
            });

            (status, Json(body)).into_response()
        }
    }
}
