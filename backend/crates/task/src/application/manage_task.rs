//! Task CRUD Use Cases
//!
//! Every lookup is owner-scoped; another user's task is reported as
//! `NotFound`.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::task::{NewTask, Task, TaskPatch};
use crate::domain::repository::TaskRepository;
use crate::domain::value_object::{TaskId, TaskStatus, UserId};
use crate::error::{TaskError, TaskResult};

/// Create task use case
pub struct CreateTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> CreateTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, owner: UserId, fields: NewTask) -> TaskResult<Task> {
        let task = Task::new(owner, fields, Utc::now());
        self.task_repo.create(&task).await?;

        tracing::debug!(task_id = %task.task_id, owner = %owner, "Task created");

        Ok(task)
    }
}

/// Get task use case
pub struct GetTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> GetTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<Task> {
        self.task_repo
            .find_owned(task_id, owner)
            .await?
            .ok_or(TaskError::NotFound)
    }
}

/// Update task use case
pub struct UpdateTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> UpdateTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    /// Read, apply the patch with its derivations, write back
    pub async fn execute(
        &self,
        task_id: &TaskId,
        owner: &UserId,
        patch: TaskPatch,
    ) -> TaskResult<Task> {
        if patch.is_empty() {
            return Err(TaskError::Validation(
                "No valid fields provided for update.".to_string(),
            ));
        }

        let mut task = self
            .task_repo
            .find_owned(task_id, owner)
            .await?
            .ok_or(TaskError::NotFound)?;

        task.apply(patch, Utc::now());

        // Deleted between read and write
        if !self.task_repo.update(&task).await? {
            return Err(TaskError::NotFound);
        }

        Ok(task)
    }
}

/// Delete task use case
pub struct DeleteTaskUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> DeleteTaskUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<()> {
        if self.task_repo.delete_owned(task_id, owner).await? {
            Ok(())
        } else {
            Err(TaskError::NotFound)
        }
    }
}

/// Bulk delete by status use case
pub struct BulkDeleteTasksUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> BulkDeleteTasksUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, owner: &UserId, status: TaskStatus) -> TaskResult<u64> {
        let deleted = self.task_repo.delete_by_status(owner, status).await?;

        tracing::info!(
            owner = %owner,
            status = %status,
            deleted,
            "Bulk deleted tasks"
        );

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::TaskTitle;
    use crate::infra::memory::InMemoryTaskRepository;

    fn fields(title: &str) -> NewTask {
        NewTask::titled(TaskTitle::new(title).unwrap())
    }

    #[tokio::test]
    async fn test_cross_user_access_is_not_found() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let alice = UserId::new();
        let bob = UserId::new();

        let task = CreateTaskUseCase::new(repo.clone())
            .execute(alice, fields("Alice's"))
            .await
            .unwrap();

        let get = GetTaskUseCase::new(repo.clone());
        assert!(matches!(
            get.execute(&task.task_id, &bob).await,
            Err(TaskError::NotFound)
        ));

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        };
        assert!(matches!(
            UpdateTaskUseCase::new(repo.clone())
                .execute(&task.task_id, &bob, patch)
                .await,
            Err(TaskError::NotFound)
        ));

        assert!(matches!(
            DeleteTaskUseCase::new(repo.clone())
                .execute(&task.task_id, &bob)
                .await,
            Err(TaskError::NotFound)
        ));

        // Still there for its owner
        assert!(get.execute(&task.task_id, &alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_sets_and_keeps_completed_at() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let owner = UserId::new();
        let task = CreateTaskUseCase::new(repo.clone())
            .execute(owner, fields("Ship"))
            .await
            .unwrap();

        let update = UpdateTaskUseCase::new(repo.clone());
        let completed = update
            .execute(
                &task.task_id,
                &owner,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        let stamp = completed.completed_at.unwrap();

        let again = update
            .execute(
                &task.task_id,
                &owner,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(again.completed_at, Some(stamp));

        let stored = GetTaskUseCase::new(repo)
            .execute(&task.task_id, &owner)
            .await
            .unwrap();
        assert_eq!(stored.completed_at, Some(stamp));
    }

    #[tokio::test]
    async fn test_empty_patch_rejected() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let err = UpdateTaskUseCase::new(repo)
            .execute(&TaskId::new(), &UserId::new(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Validation(ref m) if m == "No valid fields provided for update."));
    }

    #[tokio::test]
    async fn test_bulk_delete_is_owner_scoped() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let alice = UserId::new();
        let bob = UserId::new();
        let create = CreateTaskUseCase::new(repo.clone());

        for owner in [alice, alice, bob] {
            let mut f = fields("done");
            f.status = TaskStatus::Completed;
            create.execute(owner, f).await.unwrap();
        }
        create.execute(alice, fields("open")).await.unwrap();

        let deleted = BulkDeleteTasksUseCase::new(repo.clone())
            .execute(&alice, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let again = BulkDeleteTasksUseCase::new(repo)
            .execute(&bob, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(again, 1);
    }
}
