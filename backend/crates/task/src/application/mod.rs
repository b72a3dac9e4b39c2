//! Application Layer
//!
//! Task use cases.

pub mod list_tasks;
pub mod manage_task;
pub mod task_stats;

// Re-exports
pub use list_tasks::{ListTasksUseCase, TaskPage};
pub use manage_task::{
    BulkDeleteTasksUseCase, CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase,
    UpdateTaskUseCase,
};
pub use task_stats::{TaskStats, TaskStatsUseCase};
