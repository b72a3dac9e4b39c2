//! API Application
//!
//! Composes the auth and task routers into the HTTP application served by
//! `main`. Exposed as a library so integration tests drive the same router.

pub mod app;
pub mod config;
pub mod health;
pub mod rate_limit;

pub use app::build_app;
pub use config::{AppConfig, ConfigError, Environment};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
