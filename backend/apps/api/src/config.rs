//! Process Configuration
//!
//! Read once at startup and never mutated afterwards. Everything is built
//! from a lookup function so tests can supply their own environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use auth::AuthConfig;
use platform::password::PasswordHashConfig;
use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}

/// Deployment environment (`APP_ENV`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

/// Limits for the general and the login/signup limiter
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub general: RateLimitConfig,
    pub auth: RateLimitConfig,
    /// Reverse proxies in front of the server (`TRUSTED_PROXY_HOPS`).
    /// 0 keys limits on the socket address and ignores `X-Forwarded-For`.
    pub trusted_proxy_hops: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
    pub frontend_origins: Vec<String>,
    pub rate_limit: RateLimitSettings,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = match get("APP_ENV") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "APP_ENV",
                value: raw,
            })?,
            None => Environment::default(),
        };

        let database_url = get("DATABASE_URL");
        let access_secret = get("JWT_SECRET");
        let refresh_secret = get("JWT_REFRESH_SECRET");

        if environment.is_production() {
            if access_secret.is_none() {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
            if refresh_secret.is_none() {
                return Err(ConfigError::Missing("JWT_REFRESH_SECRET"));
            }
            if database_url.is_none() {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
        }
        if access_secret.is_some() && access_secret == refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        let mut auth = if environment.is_production() {
            AuthConfig::production(Vec::new(), Vec::new())
        } else {
            AuthConfig::development()
        };
        if let Some(secret) = access_secret {
            auth.access_token_secret = secret.into_bytes();
        }
        if let Some(secret) = refresh_secret {
            auth.refresh_token_secret = secret.into_bytes();
        }
        auth.access_token_ttl = Duration::from_secs(parse_or(&get, "JWT_ACCESS_TTL_SECS", 7 * 24 * 3600)?);
        auth.refresh_token_ttl =
            Duration::from_secs(parse_or(&get, "JWT_REFRESH_TTL_SECS", 30 * 24 * 3600)?);

        let hash_defaults = PasswordHashConfig::default();
        auth.password_hash = PasswordHashConfig {
            cost: parse_or(&get, "PASSWORD_HASH_COST", hash_defaults.cost)?,
            memory_kib: parse_or(&get, "PASSWORD_HASH_MEMORY_KIB", hash_defaults.memory_kib)?,
            ..hash_defaults
        };

        let window_secs = parse_or(&get, "RATE_LIMIT_WINDOW_SECS", 15 * 60)?;
        let rate_limit = RateLimitSettings {
            enabled: environment != Environment::Test,
            general: RateLimitConfig::new(parse_or(&get, "RATE_LIMIT_MAX", 100)?, window_secs),
            auth: RateLimitConfig::new(parse_or(&get, "AUTH_RATE_LIMIT_MAX", 10)?, window_secs),
            trusted_proxy_hops: parse_or(&get, "TRUSTED_PROXY_HOPS", 0)?,
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            environment,
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            database_url,
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            auth,
            frontend_origins,
            rate_limit,
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
