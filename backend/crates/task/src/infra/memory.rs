//! In-Memory Repository Implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::entity::task::Task;
use crate::domain::query::{TaskFilter, TaskQuery};
use crate::domain::repository::{PriorityCount, StatusCount, TaskRepository};
use crate::domain::value_object::{TaskId, TaskPriority, TaskStatus, UserId};
use crate::error::TaskResult;

/// DashMap-backed task repository
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<DashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_by<'a>(&'a self, owner: &'a UserId) -> impl Iterator<Item = Task> + 'a {
        self.tasks
            .iter()
            .filter(move |entry| entry.value().owner == *owner)
            .map(|entry| entry.value().clone())
    }
}

impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> TaskResult<()> {
        self.tasks.insert(*task.task_id.as_uuid(), task.clone());
        Ok(())
    }

    async fn find_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<Option<Task>> {
        Ok(self
            .tasks
            .get(task_id.as_uuid())
            .filter(|entry| entry.value().owner == *owner)
            .map(|entry| entry.value().clone()))
    }

    async fn update(&self, task: &Task) -> TaskResult<bool> {
        match self.tasks.get_mut(task.task_id.as_uuid()) {
            Some(mut stored) if stored.owner == task.owner => {
                *stored = task.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<bool> {
        Ok(self
            .tasks
            .remove_if(task_id.as_uuid(), |_, task| task.owner == *owner)
            .is_some())
    }

    async fn delete_by_status(&self, owner: &UserId, status: TaskStatus) -> TaskResult<u64> {
        let mut deleted = 0;
        self.tasks.retain(|_, task| {
            let hit = task.owner == *owner && task.status == status;
            if hit {
                deleted += 1;
            }
            !hit
        });
        Ok(deleted)
    }

    async fn find_page(&self, query: &TaskQuery) -> TaskResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .owned_by(query.filter.owner())
            .filter(|task| query.filter.matches(task))
            .collect();
        tasks.sort_by(|a, b| query.sort.compare(a, b));

        Ok(tasks
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &TaskFilter) -> TaskResult<u64> {
        Ok(self
            .owned_by(filter.owner())
            .filter(|task| filter.matches(task))
            .count() as u64)
    }

    async fn count_by_status(&self, owner: &UserId) -> TaskResult<Vec<StatusCount>> {
        let tasks: Vec<Task> = self.owned_by(owner).collect();
        Ok(TaskStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: tasks.iter().filter(|t| t.status == status).count() as u64,
            })
            .filter(|group| group.count > 0)
            .collect())
    }

    async fn count_by_priority(&self, owner: &UserId) -> TaskResult<Vec<PriorityCount>> {
        let tasks: Vec<Task> = self.owned_by(owner).collect();
        Ok(TaskPriority::ALL
            .into_iter()
            .map(|priority| PriorityCount {
                priority,
                count: tasks.iter().filter(|t| t.priority == priority).count() as u64,
            })
            .filter(|group| group.count > 0)
            .collect())
    }

    async fn count_overdue(&self, owner: &UserId, now: DateTime<Utc>) -> TaskResult<u64> {
        Ok(self
            .owned_by(owner)
            .filter(|task| task.is_overdue(now))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::task::NewTask;
    use crate::domain::query::TaskSort;
    use crate::domain::value_object::TaskTitle;
    use chrono::TimeDelta;
    use kernel::page::PageRequest;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_pages_cover_every_task_once() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let base = Utc::now();
        for i in 0..23 {
            // A few share a timestamp so the id tie-break matters
            let created = base + TimeDelta::seconds(i / 3);
            let task = Task::new(
                owner,
                NewTask::titled(TaskTitle::new(format!("task {i}")).unwrap()),
                created,
            );
            repo.create(&task).await.unwrap();
        }

        let filter = TaskFilter::for_owner(owner);
        let total = repo.count(&filter).await.unwrap();
        assert_eq!(total, 23);

        let mut seen = HashSet::new();
        let limit = 5;
        let pages = PageRequest::new(Some(1), Some(limit)).total_pages(total);
        assert_eq!(pages, 5);
        for page in 1..=pages as i64 {
            let query = TaskQuery {
                filter: filter.clone(),
                sort: TaskSort::default(),
                page: PageRequest::new(Some(page), Some(limit)),
            };
            for task in repo.find_page(&query).await.unwrap() {
                assert!(seen.insert(task.task_id));
            }
        }
        assert_eq!(seen.len() as u64, total);
    }

    #[tokio::test]
    async fn test_update_and_delete_check_owner() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let mut task = Task::new(
            owner,
            NewTask::titled(TaskTitle::new("mine").unwrap()),
            Utc::now(),
        );
        repo.create(&task).await.unwrap();

        let intruder = UserId::new();
        assert!(!repo.delete_owned(&task.task_id, &intruder).await.unwrap());

        task.owner = intruder;
        assert!(!repo.update(&task).await.unwrap());

        assert!(repo.delete_owned(&task.task_id, &owner).await.unwrap());
        assert!(repo.find_owned(&task.task_id, &owner).await.unwrap().is_none());
    }
}
