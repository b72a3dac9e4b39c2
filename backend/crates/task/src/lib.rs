//! Task Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Task entity, value objects, query model, repository trait
//! - `application/` - Use cases
//! - `infra/` - Database and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every operation is scoped to the authenticated owner; the access guard
//! comes from the `auth` crate.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{TaskError, TaskResult};
pub use infra::{InMemoryTaskRepository, PgTaskRepository};
pub use presentation::{TaskAppState, task_router};
