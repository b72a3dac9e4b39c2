//! Task Statistics Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::{PriorityCount, StatusCount, TaskRepository};
use crate::domain::value_object::UserId;
use crate::error::TaskResult;

/// Per-owner aggregates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    pub by_status: Vec<StatusCount>,
    pub by_priority: Vec<PriorityCount>,
    pub overdue: u64,
}

/// Task stats use case
pub struct TaskStatsUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> TaskStatsUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    pub async fn execute(&self, owner: &UserId) -> TaskResult<TaskStats> {
        let (by_status, by_priority, overdue) = tokio::try_join!(
            self.task_repo.count_by_status(owner),
            self.task_repo.count_by_priority(owner),
            self.task_repo.count_overdue(owner, Utc::now()),
        )?;

        Ok(TaskStats {
            by_status,
            by_priority,
            overdue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::task::{NewTask, Task};
    use crate::domain::repository::TaskRepository;
    use crate::domain::value_object::{TaskPriority, TaskStatus, TaskTitle};
    use crate::infra::memory::InMemoryTaskRepository;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_stats() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let owner = UserId::new();
        let now = Utc::now();

        let specs = [
            (TaskStatus::Todo, TaskPriority::High, Some(now - TimeDelta::days(1))),
            (TaskStatus::Todo, TaskPriority::Low, None),
            (TaskStatus::Completed, TaskPriority::High, Some(now - TimeDelta::days(1))),
            (TaskStatus::Archived, TaskPriority::Urgent, Some(now + TimeDelta::days(1))),
        ];
        for (status, priority, due_date) in specs {
            let mut fields = NewTask::titled(TaskTitle::new("t").unwrap());
            fields.status = status;
            fields.priority = priority;
            fields.due_date = due_date;
            repo.create(&Task::new(owner, fields, now)).await.unwrap();
        }
        // Someone else's overdue task
        let mut other = NewTask::titled(TaskTitle::new("x").unwrap());
        other.due_date = Some(now - TimeDelta::days(3));
        repo.create(&Task::new(UserId::new(), other, now)).await.unwrap();

        let stats = TaskStatsUseCase::new(repo).execute(&owner).await.unwrap();

        assert_eq!(
            stats.by_status,
            vec![
                StatusCount { status: TaskStatus::Todo, count: 2 },
                StatusCount { status: TaskStatus::Completed, count: 1 },
                StatusCount { status: TaskStatus::Archived, count: 1 },
            ]
        );
        assert_eq!(
            stats.by_priority,
            vec![
                PriorityCount { priority: TaskPriority::Low, count: 1 },
                PriorityCount { priority: TaskPriority::High, count: 2 },
                PriorityCount { priority: TaskPriority::Urgent, count: 1 },
            ]
        );
        assert_eq!(stats.overdue, 1);
    }
}
