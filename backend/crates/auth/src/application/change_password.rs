//! Change Password Use Case
//!
//! Re-authenticates with the current password, stores the new digest and
//! issues fresh tokens. Tokens minted before the change stop working.

use std::sync::Arc;

use chrono::Utc;
use kernel::validation::FieldErrors;
use platform::password::PasswordHashing;

use crate::application::config::AuthConfig;
use crate::application::sign_in::AuthOutput;
use crate::application::token::TokenService;
use crate::domain::entity::user::{User, password_changed_timestamp};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{RawPassword, UserPassword, new_password_with_confirmation};
use crate::error::{AuthError, AuthResult};

/// Change password input
#[derive(Debug, Default)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hashing: Arc<PasswordHashing>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        hashing: Arc<PasswordHashing>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            hashing,
            tokens,
            config,
        }
    }

    /// `user` is the caller resolved by the access guard
    pub async fn execute(&self, mut user: User, input: ChangePasswordInput) -> AuthResult<AuthOutput> {
        let mut errors = FieldErrors::default();
        if input.current_password.is_empty() {
            errors.push("Current password is required");
        }
        let new_password = if input.new_password.is_empty() {
            errors.push("New password is required");
            None
        } else {
            new_password_with_confirmation(
                input.new_password,
                &input.new_password_confirm,
                &mut errors,
            )
        };
        errors.finish()?;

        let Some(new_password) = new_password else {
            return Err(AuthError::Internal("validated fields missing".to_string()));
        };
        let current_password = RawPassword::unchecked(input.current_password);

        let unchanged = new_password.same_as(&current_password);

        let verified = self
            .hashing
            .verify_blocking(current_password, user.password.as_hashed().clone())
            .await;
        if !verified {
            return Err(AuthError::CurrentPasswordIncorrect);
        }
        if unchanged {
            return Err(AuthError::SamePassword);
        }

        let hashed = self.hashing.hash_blocking(new_password).await?;
        let password = UserPassword::from_hashed(hashed);
        let now = Utc::now();
        let changed_at = password_changed_timestamp(now, self.config.password_changed_backdate());
        self.user_repo
            .set_password(&user.user_id, &password, changed_at, now)
            .await?;
        user.set_password(password, changed_at, now);

        let tokens = self.tokens.issue_pair(&user.user_id)?;

        tracing::info!(user_id = %user.user_id, "Password changed");

        Ok(AuthOutput { user, tokens })
    }
}
