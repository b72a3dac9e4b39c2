//! Health Check and Fallback Handlers

use axum::Json;
use axum::extract::{OriginalUri, State};
use axum::http::Method;
use chrono::{SecondsFormat, Utc};
use kernel::error::app_error::AppError;
use serde::Serialize;

use crate::config::Environment;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: &'static str,
    pub timestamp: String,
}

/// GET /health
pub async fn health(State(environment): State<Environment>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        environment: environment.as_str(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Any route nothing else matched
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!(
        "Cannot find {method} {} on this server.",
        uri.path()
    ))
}
