//! Rate Limit Middleware
//!
//! Fixed-window limiting per client IP on top of `platform::rate_limit`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::client::extract_client_ip;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimitStore};

pub const GENERAL_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes.";
pub const AUTH_LIMIT_MESSAGE: &str =
    "Too many login attempts from this IP. Please try again after 15 minutes.";

/// Paths counted by the credential limiter
const CREDENTIAL_PATHS: &[&str] = &["/signup", "/login"];

/// One limiter with its own counters, limits and rejection message
pub struct RateLimitState<S = InMemoryRateLimitStore>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    store: Arc<S>,
    config: RateLimitConfig,
    message: &'static str,
    /// Only requests whose path ends with one of these are counted
    path_suffixes: Option<&'static [&'static str]>,
    /// Reverse proxies whose `X-Forwarded-For` entries are believed
    trusted_proxy_hops: usize,
}

impl<S> Clone for RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            message: self.message,
            path_suffixes: self.path_suffixes,
            trusted_proxy_hops: self.trusted_proxy_hops,
        }
    }
}

impl RateLimitState<InMemoryRateLimitStore> {
    /// Limiter for every API request
    pub fn general(config: RateLimitConfig) -> Self {
        Self::new(InMemoryRateLimitStore::new(), config, GENERAL_LIMIT_MESSAGE)
    }

    /// Stricter limiter for signup and login
    pub fn credentials(config: RateLimitConfig) -> Self {
        Self::new(InMemoryRateLimitStore::new(), config, AUTH_LIMIT_MESSAGE)
            .only_paths_ending_with(CREDENTIAL_PATHS)
    }
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(store: S, config: RateLimitConfig, message: &'static str) -> Self {
        Self {
            store: Arc::new(store),
            config,
            message,
            path_suffixes: None,
            trusted_proxy_hops: 0,
        }
    }

    pub fn only_paths_ending_with(mut self, suffixes: &'static [&'static str]) -> Self {
        self.path_suffixes = Some(suffixes);
        self
    }

    pub fn trusting_proxy_hops(mut self, hops: usize) -> Self {
        self.trusted_proxy_hops = hops;
        self
    }

    fn applies_to(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.path_suffixes
            .is_none_or(|suffixes| suffixes.iter().any(|s| path.ends_with(s)))
    }
}

/// Reject with 429 and `Retry-After` once the client's window is used up
///
/// A failing store lets the request through.
pub async fn rate_limit<S>(State(state): State<RateLimitState<S>>, req: Request, next: Next) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    if !state.applies_to(req.uri().path()) {
        return next.run(req).await;
    }

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let key = extract_client_ip(req.headers(), direct_ip, state.trusted_proxy_hops)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let result = match state.store.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit store failed, allowing request");
            return next.run(req).await;
        }
    };

    if result.allowed {
        return next.run(req).await;
    }

    let retry_after = result.retry_after_secs(InMemoryRateLimitStore::now_ms());
    tracing::warn!(client_ip = %key, retry_after, "Rate limit exceeded");

    let mut response = AppError::too_many_requests(state.message).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
