//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordHashConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Length of generated signing secrets
const GENERATED_SECRET_LEN: usize = 64;

/// Value written over the refresh cookie on logout
pub const LOGGED_OUT_SENTINEL: &str = "logged_out";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 secret for access tokens
    pub access_token_secret: Vec<u8>,
    /// HS256 secret for refresh tokens; must differ from the access secret
    pub refresh_token_secret: Vec<u8>,
    /// Access token lifetime (7 days)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime, also the refresh cookie Max-Age (30 days)
    pub refresh_token_ttl: Duration,
    /// Cookie consulted by the access guard when no bearer header is sent
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy for the refresh cookie
    pub cookie_same_site: SameSite,
    /// Lifetime of the logout sentinel cookie
    pub logout_cookie_ttl: Duration,
    /// How far `passwordChangedAt` is backdated
    pub password_changed_backdate: Duration,
    /// Argon2 cost parameters
    pub password_hash: PasswordHashConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: platform::crypto::random_bytes(GENERATED_SECRET_LEN),
            refresh_token_secret: platform::crypto::random_bytes(GENERATED_SECRET_LEN),
            access_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            logout_cookie_ttl: Duration::from_secs(10),
            password_changed_backdate: Duration::from_secs(1),
            password_hash: PasswordHashConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Production settings with explicit secrets (Secure, SameSite=None)
    pub fn production(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_token_secret: access_secret.into(),
            refresh_token_secret: refresh_secret.into(),
            ..Self::default()
        }
    }

    /// Create config for development (random secrets, insecure Lax cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::default()
        }
    }

    /// Refresh cookie attributes
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig::http_only(&self.refresh_cookie_name)
            .secure(self.cookie_secure)
            .same_site(self.cookie_same_site)
            .max_age_secs(self.refresh_token_ttl.as_secs() as i64)
    }

    /// Short-lived sentinel cookie overwriting the refresh cookie
    pub fn logout_cookie(&self) -> CookieConfig {
        CookieConfig::http_only(&self.refresh_cookie_name)
            .secure(self.cookie_secure)
            .same_site(SameSite::Strict)
            .max_age_secs(self.logout_cookie_ttl.as_secs() as i64)
    }

    pub fn password_changed_backdate(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds(self.password_changed_backdate.as_millis() as i64)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("refresh_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_hash", &self.password_hash)
            .finish_non_exhaustive()
    }
}
