//! Sign Out Use Case
//!
//! Tokens are stateless; signing out overwrites the refresh cookie with a
//! short-lived sentinel.

use std::sync::Arc;

use crate::application::config::{AuthConfig, LOGGED_OUT_SENTINEL};
use crate::domain::value_object::UserId;

/// Sign out use case
pub struct SignOutUseCase {
    config: Arc<AuthConfig>,
}

impl SignOutUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Returns the `Set-Cookie` header value
    pub fn execute(&self, user_id: &UserId) -> String {
        tracing::info!(user_id = %user_id, "User signed out");

        self.config
            .logout_cookie()
            .build_set_cookie(LOGGED_OUT_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_out_overwrites_refresh_cookie() {
        let use_case = SignOutUseCase::new(Arc::new(AuthConfig::development()));
        let cookie = use_case.execute(&UserId::new());
        assert!(cookie.starts_with("refreshToken=logged_out;"));
        assert!(cookie.contains("HttpOnly"));
    }
}
