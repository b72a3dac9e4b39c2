//! Domain Layer
//!
//! Contains the task entity, value objects, the query model and the
//! repository trait.

pub mod entity;
pub mod query;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{NewTask, Task, TaskPatch};
pub use query::{SortField, SortOrder, TaskFilter, TaskQuery, TaskSort};
pub use repository::{PriorityCount, StatusCount, TaskRepository};
