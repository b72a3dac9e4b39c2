//! Task Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    TaskDescription, TaskId, TaskPriority, TaskStatus, TaskTags, TaskTitle, UserId,
};

/// Task entity, always owned by exactly one user
#[derive(Debug, Clone)]
pub struct Task {
    pub task_id: TaskId,
    pub owner: UserId,
    pub title: TaskTitle,
    pub description: TaskDescription,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub tags: TaskTags,
    pub due_date: Option<DateTime<Utc>>,
    /// Set iff `status` is completed
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new task; the rest take their defaults
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: TaskTitle,
    pub description: TaskDescription,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub tags: TaskTags,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: TaskTitle) -> Self {
        Self {
            title,
            description: TaskDescription::default(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            tags: TaskTags::default(),
            due_date: None,
        }
    }
}

/// Fields a user may change on their task
///
/// Cannot carry id, owner, `completed_at` or timestamps. `due_date` is
/// doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<TaskTitle>,
    pub description: Option<TaskDescription>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<TaskTags>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.due_date.is_none()
    }
}

impl Task {
    pub fn new(owner: UserId, fields: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            task_id: TaskId::new(),
            owner,
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            tags: fields.tags,
            due_date: fields.due_date,
            completed_at: completion_time(fields.status, None, now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch and re-derive `completed_at`
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }

        self.completed_at = completion_time(self.status, self.completed_at, now);
        self.updated_at = now;
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.status, self.due_date, now)
    }
}

// ============================================================================
// Derivations
// ============================================================================

/// `completed_at` for a task saved with `status`
///
/// Entering completed stamps `now`; staying completed keeps `existing`;
/// any other status clears it.
pub fn completion_time(
    status: TaskStatus,
    existing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if status.is_completed() {
        Some(existing.unwrap_or(now))
    } else {
        None
    }
}

/// Past due and not completed
pub fn is_overdue(status: TaskStatus, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    !status.is_completed() && due_date.is_some_and(|due| due < now)
}
