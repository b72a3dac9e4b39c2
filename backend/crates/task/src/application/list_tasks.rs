//! List Tasks Use Case

use std::sync::Arc;

use crate::domain::entity::task::Task;
use crate::domain::query::TaskQuery;
use crate::domain::repository::TaskRepository;
use crate::error::TaskResult;

/// One page of the caller's tasks
#[derive(Debug, Clone)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

/// List tasks use case
pub struct ListTasksUseCase<T>
where
    T: TaskRepository,
{
    task_repo: Arc<T>,
}

impl<T> ListTasksUseCase<T>
where
    T: TaskRepository,
{
    pub fn new(task_repo: Arc<T>) -> Self {
        Self { task_repo }
    }

    /// Page and total are fetched concurrently; either failing fails both
    pub async fn execute(&self, query: TaskQuery) -> TaskResult<TaskPage> {
        let (tasks, total) = tokio::try_join!(
            self.task_repo.find_page(&query),
            self.task_repo.count(&query.filter),
        )?;

        Ok(TaskPage {
            tasks,
            total,
            page: query.page.page(),
            pages: query.page.total_pages(total),
        })
    }
}
