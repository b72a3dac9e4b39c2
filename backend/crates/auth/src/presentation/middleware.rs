//! Auth Middleware
//!
//! Access guard, role restriction and optional authentication.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use platform::client::extract_bearer_token;
use platform::cookie::extract_cookie;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The authenticated caller, stored in request extensions by the guard
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::NotLoggedIn)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

/// Roles allowed past [`restrict_to`]
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [UserRole]);

/// Bearer header first, then the access-token cookie
pub fn access_token(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    extract_bearer_token(headers).or_else(|| extract_cookie(headers, &config.access_cookie_name))
}

/// Middleware that requires a valid access token
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = access_token(req.headers(), &state.config);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.tokens.clone());
    let user = use_case.execute(token.as_deref()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that attaches the caller when a valid token is present
/// and otherwise proceeds anonymously
pub async fn optional_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = access_token(req.headers(), &state.config);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.tokens.clone());
    if let Some(user) = use_case.try_execute(token.as_deref()).await {
        req.extensions_mut().insert(CurrentUser(user));
    }

    next.run(req).await
}

/// Middleware that checks the caller's role; layer it inside [`require_auth`]
pub async fn restrict_to(
    State(AllowedRoles(roles)): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let CurrentUser(user) = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::NotLoggedIn)?;

    if !roles.contains(&user.role) {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}
