//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AllowedRoles, CurrentUser, optional_auth, require_auth, restrict_to};
pub use router::{auth_router, users_router};
