//! Repository Traits
//!
//! Interfaces for task persistence. Every method is scoped to an owner.

use chrono::{DateTime, Utc};

use crate::domain::entity::task::Task;
use crate::domain::query::{TaskFilter, TaskQuery};
use crate::domain::value_object::{TaskId, TaskPriority, TaskStatus, UserId};
use crate::error::TaskResult;

/// Number of tasks in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: u64,
}

/// Number of tasks at one priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCount {
    pub priority: TaskPriority,
    pub count: u64,
}

/// Task repository trait
#[trait_variant::make(TaskRepository: Send)]
pub trait LocalTaskRepository {
    async fn create(&self, task: &Task) -> TaskResult<()>;

    /// Find a task by id, only if `owner` owns it
    async fn find_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<Option<Task>>;

    /// Overwrite the mutable fields; false if the task is gone
    async fn update(&self, task: &Task) -> TaskResult<bool>;

    /// Hard delete; false if nothing owned by `owner` had that id
    async fn delete_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<bool>;

    /// Delete every task of `owner` in `status`; returns how many
    async fn delete_by_status(&self, owner: &UserId, status: TaskStatus) -> TaskResult<u64>;

    async fn find_page(&self, query: &TaskQuery) -> TaskResult<Vec<Task>>;

    async fn count(&self, filter: &TaskFilter) -> TaskResult<u64>;

    /// Non-empty groups only, in status order
    async fn count_by_status(&self, owner: &UserId) -> TaskResult<Vec<StatusCount>>;

    /// Non-empty groups only, in priority order
    async fn count_by_priority(&self, owner: &UserId) -> TaskResult<Vec<PriorityCount>>;

    /// Not completed and due strictly before `now`
    async fn count_overdue(&self, owner: &UserId, now: DateTime<Utc>) -> TaskResult<u64>;
}
