//! Check Session Use Case
//!
//! Resolves the caller behind an access token. Used by the access guard.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> CheckSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// Verify the token and load its user
    ///
    /// Checks run in order: presence, signature and expiry, user exists,
    /// user active, token issued after the last password change.
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NotLoggedIn)?;

        let verified = self.tokens.verify_access(token)?;

        let user = self
            .user_repo
            .find_by_id(&verified.user_id)
            .await?
            .ok_or(AuthError::TokenUserGone)?;

        if !user.is_active {
            return Err(AuthError::TokenUserInactive);
        }

        if user.password_changed_after(verified.issued_at) {
            return Err(AuthError::TokenStale);
        }

        Ok(user)
    }

    /// Like [`CheckSessionUseCase::execute`] but never fails
    pub async fn try_execute(&self, token: Option<&str>) -> Option<User> {
        self.execute(token).await.ok()
    }
}
