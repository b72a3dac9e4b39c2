//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::WithRejection;
use kernel::error::app_error::AppError;
use platform::password::PasswordHashing;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthOutput, ChangePasswordInput, ChangePasswordUseCase, DeactivateAccountUseCase,
    GetProfileUseCase, GetUserUseCase, ListUsersUseCase, RefreshUseCase, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase, TokenService,
    UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, AuthResponse, ChangePasswordRequest, ListUsersQuery, MessageResponse,
    RefreshRequest, SignInRequest, SignUpRequest, UpdateMeRequest, UserEnvelope,
    UserListResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers and middleware
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub hashing: Arc<PasswordHashing>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Fails only on invalid Argon2 parameters
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let hashing = PasswordHashing::new(config.password_hash)?;
        let tokens = TokenService::new(&config);

        Ok(Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            hashing: Arc::new(hashing),
        })
    }
}

/// Access token in the body, refresh token in an HttpOnly cookie
fn session_response(config: &AuthConfig, status: StatusCode, output: AuthOutput) -> Response {
    let cookie = config
        .refresh_cookie()
        .build_set_cookie(&output.tokens.refresh_token);

    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            access_token: output.tokens.access_token,
            user: (&output.user).into(),
        }),
    )
        .into_response()
}

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse::<UserId>()
        .map_err(|_| AuthError::Validation("Invalid user ID".to_string()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    WithRejection(Json(req), _): WithRejection<Json<SignUpRequest>, AppError>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.hashing.clone(),
        state.tokens.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        password_confirm: req.password_confirm,
    };

    let output = use_case.execute(input).await?;

    Ok(session_response(&state.config, StatusCode::CREATED, output))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    WithRejection(Json(req), _): WithRejection<Json<SignInRequest>, AppError>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.hashing.clone(),
        state.tokens.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(session_response(&state.config, StatusCode::OK, output))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Json<AccessTokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name)
        .or_else(|| RefreshRequest::from_body(&body).refresh_token);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.tokens.clone());
    let access_token = use_case.execute(token.as_deref()).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/logout
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.config.clone());
    let cookie = use_case.execute(&user.user_id);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logged out successfully.".to_string(),
        }),
    )
}

// ============================================================================
// Change Password
// ============================================================================

/// PATCH /api/auth/change-password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<ChangePasswordRequest>, AppError>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(
        state.repo.clone(),
        state.hashing.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = ChangePasswordInput {
        current_password: req.current_password,
        new_password: req.new_password,
        new_password_confirm: req.new_password_confirm,
    };

    let output = use_case.execute(user, input).await?;

    Ok(session_response(&state.config, StatusCode::OK, output))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/users/me
pub async fn get_me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user): CurrentUser,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetProfileUseCase::new(state.repo.clone());
    let user = use_case.execute(&user.user_id).await?;

    Ok(Json((&user).into()))
}

/// PATCH /api/users/me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<UpdateMeRequest>, AppError>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let patch = req.into_patch()?;

    let use_case = UpdateProfileUseCase::new(state.repo.clone());
    let user = use_case.execute(&user.user_id, patch).await?;

    Ok(Json((&user).into()))
}

/// DELETE /api/users/me
pub async fn delete_me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user): CurrentUser,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeactivateAccountUseCase::new(state.repo.clone());
    use_case.execute(&user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    WithRejection(Query(query), _): WithRejection<Query<ListUsersQuery>, AppError>,
) -> AuthResult<Json<UserListResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let (filter, page) = query.into_parts()?;

    let use_case = ListUsersUseCase::new(state.repo.clone());
    let output = use_case.execute(filter, page).await?;

    Ok(Json(output.into()))
}

/// GET /api/users/{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    let use_case = GetUserUseCase::new(state.repo.clone());
    let user = use_case.execute(&user_id).await?;

    Ok(Json((&user).into()))
}
