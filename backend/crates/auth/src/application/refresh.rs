//! Refresh Use Case
//!
//! Exchanges a refresh token for a new access token. The refresh token
//! itself is not rotated.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// `token` comes from the refresh cookie or, failing that, the body
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<String> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::RefreshTokenMissing)?;

        let verified = self.tokens.verify_refresh(token)?;

        let user = self
            .user_repo
            .find_by_id(&verified.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::RefreshUserInvalid)?;

        tracing::debug!(user_id = %user.user_id, "Access token refreshed");

        self.tokens.sign_access(&user.user_id)
    }
}
