//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use kernel::error::app_error::AppError;
use std::sync::Arc;

use auth::CurrentUser;

use crate::application::{
    BulkDeleteTasksUseCase, CreateTaskUseCase, DeleteTaskUseCase, GetTaskUseCase,
    ListTasksUseCase, TaskStatsUseCase, UpdateTaskUseCase,
};
use crate::domain::repository::TaskRepository;
use crate::domain::value_object::{TaskId, TaskStatus};
use crate::error::{TaskError, TaskResult};
use crate::presentation::dto::{
    BulkDeleteQuery, BulkDeleteResponse, CreateTaskRequest, ListTasksQuery, TaskEnvelope,
    TaskListResponse, TaskStatsResponse, UpdateTaskRequest,
};

/// Shared state for task handlers
#[derive(Clone)]
pub struct TaskAppState<T>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<T>,
}

impl<T> TaskAppState<T>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: T) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

fn parse_task_id(raw: &str) -> TaskResult<TaskId> {
    raw.parse::<TaskId>().map_err(|_| TaskError::InvalidTaskId)
}

/// GET /api/tasks
pub async fn list_tasks<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<ListTasksQuery>, AppError>,
) -> TaskResult<Json<TaskListResponse>>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let query = query.into_query(user.user_id)?;

    let use_case = ListTasksUseCase::new(state.repo.clone());
    let page = use_case.execute(query).await?;

    Ok(Json(page.into()))
}

/// POST /api/tasks
pub async fn create_task<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateTaskRequest>, AppError>,
) -> TaskResult<(StatusCode, Json<TaskEnvelope>)>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let fields = req.into_new_task()?;

    let use_case = CreateTaskUseCase::new(state.repo.clone());
    let task = use_case.execute(user.user_id, fields).await?;

    Ok((StatusCode::CREATED, Json(TaskEnvelope::new(&task))))
}

/// GET /api/tasks/{id}
pub async fn get_task<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> TaskResult<Json<TaskEnvelope>>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;

    let use_case = GetTaskUseCase::new(state.repo.clone());
    let task = use_case.execute(&task_id, &user.user_id).await?;

    Ok(Json(TaskEnvelope::new(&task)))
}

/// PATCH /api/tasks/{id}
pub async fn update_task<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateTaskRequest>, AppError>,
) -> TaskResult<Json<TaskEnvelope>>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;
    let patch = req.into_patch()?;

    let use_case = UpdateTaskUseCase::new(state.repo.clone());
    let task = use_case.execute(&task_id, &user.user_id, patch).await?;

    Ok(Json(TaskEnvelope::new(&task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> TaskResult<StatusCode>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;

    let use_case = DeleteTaskUseCase::new(state.repo.clone());
    use_case.execute(&task_id, &user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/tasks/bulk?status=X
pub async fn bulk_delete_tasks<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(query), _): WithRejection<Query<BulkDeleteQuery>, AppError>,
) -> TaskResult<Json<BulkDeleteResponse>>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let raw = query
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or(TaskError::BulkStatusMissing)?;
    let status: TaskStatus = raw.trim().parse()?;

    let use_case = BulkDeleteTasksUseCase::new(state.repo.clone());
    let deleted = use_case.execute(&user.user_id, status).await?;

    Ok(Json(BulkDeleteResponse::new(deleted, status)))
}

/// GET /api/tasks/stats
pub async fn task_stats<T>(
    State(state): State<TaskAppState<T>>,
    CurrentUser(user): CurrentUser,
) -> TaskResult<Json<TaskStatsResponse>>
where
    T: TaskRepository + Clone + Send + Sync + 'static,
{
    let use_case = TaskStatsUseCase::new(state.repo.clone());
    let stats = use_case.execute(&user.user_id).await?;

    Ok(Json(stats.into()))
}
