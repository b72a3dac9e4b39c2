//! Sign Up Use Case
//!
//! Creates a new user account and signs it in.

use std::sync::Arc;

use kernel::validation::FieldErrors;
use platform::password::PasswordHashing;

use crate::application::sign_in::AuthOutput;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    Email, UserName, UserPassword, new_password_with_confirmation,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
#[derive(Debug, Default)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hashing: Arc<PasswordHashing>,
    tokens: Arc<TokenService>,
}

impl<U> SignUpUseCase<U>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AuthOutput> {
        let mut errors = FieldErrors::default();
        let name = errors.check(UserName::new(input.name));
        let email = errors.check_app(Email::new(input.email));
        let password =
            new_password_with_confirmation(input.password, &input.password_confirm, &mut errors);
        errors.finish()?;

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AuthError::Internal("validated fields missing".to_string()));
        };

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let hashed = self.hashing.hash_blocking(password).await?;
        let user = User::new(name, email, UserPassword::from_hashed(hashed));

        // Races with a concurrent signup surface here as EmailTaken
        self.user_repo.create(&user).await?;

        let tokens = self.tokens.issue_pair(&user.user_id)?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User signed up"
        );

        Ok(AuthOutput { user, tokens })
    }
}
