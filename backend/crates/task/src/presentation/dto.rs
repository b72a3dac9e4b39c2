//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::page::PageRequest;
use kernel::validation::FieldErrors;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::{TaskPage, TaskStats};
use crate::domain::entity::task::{NewTask, Task, TaskPatch};
use crate::domain::query::{SortField, SortOrder, TaskFilter, TaskQuery, TaskSort};
use crate::domain::value_object::{
    SearchText, TaskDescription, TaskId, TaskPriority, TaskStatus, TaskTags, TaskTitle,
    TitleError, UserId, parse_instant,
};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`); pair with `#[serde(default)]`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Task View
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub user: UserId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    /// `is_overdue` is evaluated against `now`
    pub fn new(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.task_id,
            user: task.owner,
            title: task.title.as_str().to_string(),
            description: task.description.as_str().to_string(),
            status: task.status,
            priority: task.priority,
            tags: task.tags.as_slice().to_vec(),
            due_date: task.due_date,
            completed_at: task.completed_at,
            is_overdue: task.is_overdue(now),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// `{ task }`
#[derive(Debug, Clone, Serialize)]
pub struct TaskEnvelope {
    pub task: TaskResponse,
}

impl TaskEnvelope {
    pub fn new(task: &Task) -> Self {
        Self {
            task: TaskResponse::new(task, Utc::now()),
        }
    }
}

/// `{ tasks, total, page, pages }`
#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl From<TaskPage> for TaskListResponse {
    fn from(page: TaskPage) -> Self {
        let now = Utc::now();
        Self {
            tasks: page.tasks.iter().map(|t| TaskResponse::new(t, now)).collect(),
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

// ============================================================================
// Field Parsing
// ============================================================================

fn parse_status(raw: &str, errors: &mut FieldErrors) -> Option<TaskStatus> {
    errors.check_app(raw.parse())
}

fn parse_priority(raw: &str, errors: &mut FieldErrors) -> Option<TaskPriority> {
    errors.check_app(raw.parse())
}

/// Tags arrive as untyped JSON so shape errors get their own message
fn parse_tags(raw: Value, errors: &mut FieldErrors) -> Option<TaskTags> {
    let Value::Array(items) = raw else {
        errors.push("Tags must be an array of max 10 items");
        return None;
    };

    let tags: Option<Vec<String>> = items
        .into_iter()
        .map(|item| match item {
            Value::String(tag) => Some(tag),
            _ => None,
        })
        .collect();

    match tags {
        Some(tags) => errors.check_app(TaskTags::new(tags)),
        None => {
            errors.push("Each tag must be a non-empty string");
            None
        }
    }
}

fn parse_due_date(raw: &str, errors: &mut FieldErrors) -> Option<DateTime<Utc>> {
    let parsed = parse_instant(raw);
    if parsed.is_none() {
        errors.push("Due date must be a valid ISO 8601 date");
    }
    parsed
}

// ============================================================================
// Create / Update
// ============================================================================

/// `POST /tasks` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<Value>,
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_new_task(self) -> AppResult<NewTask> {
        let mut errors = FieldErrors::default();

        let title = errors.check(TaskTitle::new(self.title.unwrap_or_default()));
        let description = self
            .description
            .map(|d| errors.check_app(TaskDescription::new(d)));
        let status = self.status.map(|s| parse_status(&s, &mut errors));
        let priority = self.priority.map(|p| parse_priority(&p, &mut errors));
        let tags = self.tags.map(|t| parse_tags(t, &mut errors));
        let due_date = self.due_date.map(|d| parse_due_date(&d, &mut errors));
        errors.finish()?;

        let title = title.ok_or_else(|| AppError::bad_request(TitleError::Empty.to_string()))?;

        Ok(NewTask {
            title,
            description: description.flatten().unwrap_or_default(),
            status: status.flatten().unwrap_or_default(),
            priority: priority.flatten().unwrap_or_default(),
            tags: tags.flatten().unwrap_or_default(),
            due_date: due_date.flatten(),
        })
    }
}

/// `PATCH /tasks/{id}` body
///
/// Unknown fields are ignored; `dueDate: null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<Value>,
    #[serde(deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn into_patch(self) -> AppResult<TaskPatch> {
        let mut errors = FieldErrors::default();

        let title = self.title.and_then(|t| match TaskTitle::new(t) {
            Ok(title) => Some(title),
            Err(TitleError::Empty) => {
                errors.push("Title cannot be empty");
                None
            }
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        });
        let description = self
            .description
            .and_then(|d| errors.check_app(TaskDescription::new(d)));
        let status = self.status.and_then(|s| parse_status(&s, &mut errors));
        let priority = self.priority.and_then(|p| parse_priority(&p, &mut errors));
        let tags = self.tags.and_then(|t| parse_tags(t, &mut errors));
        let due_date = match self.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => parse_due_date(&raw, &mut errors).map(Some),
        };
        errors.finish()?;

        Ok(TaskPatch {
            title,
            description,
            status,
            priority,
            tags,
            due_date,
        })
    }
}

// ============================================================================
// List
// ============================================================================

/// `GET /tasks` query string; every value arrives as text
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    pub due_before: Option<String>,
    pub due_after: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListTasksQuery {
    /// Invalid `status`, `priority` or dates are rejected; unknown sort
    /// keys and malformed paging fall back to defaults
    pub fn into_query(self, owner: UserId) -> AppResult<TaskQuery> {
        let mut errors = FieldErrors::default();
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let mut filter = TaskFilter::for_owner(owner);

        if let Some(raw) = present(self.status) {
            match TaskStatus::from_code(raw.trim()) {
                Some(status) => filter.status = Some(status),
                None => errors.push("Invalid status filter"),
            }
        }
        if let Some(raw) = present(self.priority) {
            match TaskPriority::from_code(raw.trim()) {
                Some(priority) => filter.priority = Some(priority),
                None => errors.push("Invalid priority filter"),
            }
        }
        if let Some(raw) = present(self.tags) {
            filter.tags = raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = present(self.due_before) {
            filter.due_before = parse_instant(&raw);
            if filter.due_before.is_none() {
                errors.push("dueBefore must be a valid date");
            }
        }
        if let Some(raw) = present(self.due_after) {
            filter.due_after = parse_instant(&raw);
            if filter.due_after.is_none() {
                errors.push("dueAfter must be a valid date");
            }
        }
        filter.search = self.search.as_deref().and_then(SearchText::new);
        errors.finish()?;

        let sort = TaskSort {
            field: self
                .sort_by
                .as_deref()
                .and_then(SortField::from_param)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .and_then(SortOrder::from_param)
                .unwrap_or_default(),
        };
        let page = PageRequest::from_query(self.page.as_deref(), self.limit.as_deref());

        Ok(TaskQuery { filter, sort, page })
    }
}

// ============================================================================
// Bulk Delete
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BulkDeleteQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
    pub message: String,
}

impl BulkDeleteResponse {
    pub fn new(deleted_count: u64, status: TaskStatus) -> Self {
        Self {
            deleted_count,
            message: format!("Deleted {deleted_count} task(s) with status \"{status}\"."),
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountResponse {
    pub status: TaskStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityCountResponse {
    pub priority: TaskPriority,
    pub count: u64,
}

/// `{ byStatus, byPriority, overdue }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsResponse {
    pub by_status: Vec<StatusCountResponse>,
    pub by_priority: Vec<PriorityCountResponse>,
    pub overdue: u64,
}

impl From<TaskStats> for TaskStatsResponse {
    fn from(stats: TaskStats) -> Self {
        Self {
            by_status: stats
                .by_status
                .into_iter()
                .map(|g| StatusCountResponse {
                    status: g.status,
                    count: g.count,
                })
                .collect(),
            by_priority: stats
                .by_priority
                .into_iter()
                .map(|g| PriorityCountResponse {
                    priority: g.priority,
                    count: g.count,
                })
                .collect(),
            overdue: stats.overdue,
        }
    }
}
