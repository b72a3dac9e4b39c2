//! Sign In Use Case
//!
//! Authenticates a user by email and password.

use std::sync::Arc;

use chrono::Utc;
use platform::password::PasswordHashing;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
#[derive(Debug, Default)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// A user together with freshly issued tokens
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hashing: Arc<PasswordHashing>,
    tokens: Arc<TokenService>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hashing: Arc<PasswordHashing>, tokens: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            hashing,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<AuthOutput> {
        let email = Email::new(input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let password = RawPassword::unchecked(input.password);

        // Unknown email and wrong password must be indistinguishable, in
        // timing as well as in the response
        let Some(mut user) = self.user_repo.find_by_email(&email).await? else {
            self.hashing
                .verify_blocking(password, self.hashing.decoy().clone())
                .await;
            tracing::debug!(email = %email, "Sign in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let verified = self
            .hashing
            .verify_blocking(password, user.password.as_hashed().clone())
            .await;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let now = Utc::now();
        self.user_repo.record_login(&user.user_id, now).await?;
        user.record_login(now);

        let tokens = self.tokens.issue_pair(&user.user_id)?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(AuthOutput { user, tokens })
    }
}
