//! Application Builder
//!
//! Wires the auth and task routers onto one `Router` with the
//! cross-cutting layers. Both stores are injected so the same wiring runs
//! against PostgreSQL in production and the in-memory stores in tests.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{Router, middleware, routing::get};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use auth::domain::repository::UserRepository;
use auth::{AuthAppState, auth_router, users_router};
use kernel::error::app_error::AppResult;
use platform::rate_limit::InMemoryRateLimitStore;
use task::domain::repository::TaskRepository;
use task::{TaskAppState, task_router};

use crate::config::AppConfig;
use crate::health::{health, not_found};
use crate::rate_limit::{RateLimitState, rate_limit};

/// JSON bodies above this size are rejected
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

pub fn build_app<U, T>(config: &AppConfig, users: U, tasks: T) -> AppResult<Router>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let auth_state =
        AuthAppState::new(users, config.auth.clone()).map_err(|e| e.into_app_error())?;

    let mut api = Router::new()
        .nest("/auth", auth_router(auth_state.clone()))
        .nest("/users", users_router(auth_state.clone()))
        .nest("/tasks", task_router(TaskAppState::new(tasks), auth_state));

    if config.rate_limit.enabled {
        // The last layer added runs first
        api = api
            .layer(middleware::from_fn_with_state(
                RateLimitState::credentials(config.rate_limit.auth.clone())
                    .trusting_proxy_hops(config.rate_limit.trusted_proxy_hops),
                rate_limit::<InMemoryRateLimitStore>,
            ))
            .layer(middleware::from_fn_with_state(
                RateLimitState::general(config.rate_limit.general.clone())
                    .trusting_proxy_hops(config.rate_limit.trusted_proxy_hops),
                rate_limit::<InMemoryRateLimitStore>,
            ));
    } else {
        tracing::debug!("Rate limiting disabled");
    }

    let app = Router::new()
        .route("/health", get(health).with_state(config.environment))
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins));

    Ok(app)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
