//! Task Query
//!
//! Owner-scoped filter, sort and page for the task list. The in-memory
//! store evaluates these directly; the PostgreSQL store translates them to
//! SQL with the same semantics.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use kernel::page::PageRequest;

use crate::domain::entity::task::Task;
use crate::domain::value_object::{SearchText, TaskPriority, TaskStatus, UserId};

/// Task list filter
///
/// `owner` is not optional: every query is scoped to one user.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    owner: UserId,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Match tasks carrying at least one of these
    pub tags: Vec<String>,
    /// Inclusive upper bound on `due_date`
    pub due_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on `due_date`
    pub due_after: Option<DateTime<Utc>>,
    pub search: Option<SearchText>,
}

impl TaskFilter {
    pub fn for_owner(owner: UserId) -> Self {
        Self {
            owner,
            status: None,
            priority: None,
            tags: Vec::new(),
            due_before: None,
            due_after: None,
            search: None,
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn matches(&self, task: &Task) -> bool {
        if task.owner != self.owner {
            return false;
        }
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if !self.tags.is_empty() && !task.tags.contains_any(&self.tags) {
            return false;
        }
        if self.due_before.is_some() || self.due_after.is_some() {
            let Some(due) = task.due_date else {
                return false;
            };
            if self.due_before.is_some_and(|before| due > before)
                || self.due_after.is_some_and(|after| due < after)
            {
                return false;
            }
        }
        if let Some(search) = &self.search {
            return search.matches(task.title.as_str(), task.description.as_str());
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Title,
}

impl SortField {
    /// Unknown names yield `None`; callers fall back to the default
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "dueDate" => Some(SortField::DueDate),
            "priority" => Some(SortField::Priority),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Sort key plus direction; ties are broken by task id in the same direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl TaskSort {
    /// Total order over tasks. A missing due date sorts before any date.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let by_field = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::DueDate => a.due_date.cmp(&b.due_date),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Title => a.title.as_str().cmp(b.title.as_str()),
        };
        let ordering = by_field.then_with(|| a.task_id.cmp(&b.task_id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One page of the task list
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub sort: TaskSort,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::task::NewTask;
    use crate::domain::value_object::{TaskDescription, TaskTags, TaskTitle};
    use chrono::TimeDelta;

    fn task(owner: UserId, title: &str) -> Task {
        Task::new(
            owner,
            NewTask::titled(TaskTitle::new(title).unwrap()),
            Utc::now(),
        )
    }

    #[test]
    fn test_owner_is_always_applied() {
        let alice = UserId::new();
        let bob = UserId::new();
        let filter = TaskFilter::for_owner(alice);

        assert!(filter.matches(&task(alice, "mine")));
        assert!(!filter.matches(&task(bob, "theirs")));
    }

    #[test]
    fn test_status_priority_and_tags() {
        let owner = UserId::new();
        let mut t = task(owner, "Ship");
        t.status = TaskStatus::InProgress;
        t.priority = TaskPriority::High;
        t.tags = TaskTags::new(vec!["work".into(), "q3".into()]).unwrap();

        let mut filter = TaskFilter::for_owner(owner);
        filter.status = Some(TaskStatus::InProgress);
        filter.priority = Some(TaskPriority::High);
        filter.tags = vec!["home".into(), "q3".into()];
        assert!(filter.matches(&t));

        filter.tags = vec!["home".into()];
        assert!(!filter.matches(&t));

        filter.tags.clear();
        filter.status = Some(TaskStatus::Todo);
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_due_range_is_inclusive_and_excludes_undated() {
        let owner = UserId::new();
        let due = Utc::now();
        let mut dated = task(owner, "dated");
        dated.due_date = Some(due);
        let undated = task(owner, "undated");

        let mut filter = TaskFilter::for_owner(owner);
        filter.due_before = Some(due);
        filter.due_after = Some(due);
        assert!(filter.matches(&dated));
        assert!(!filter.matches(&undated));

        filter.due_after = Some(due + TimeDelta::seconds(1));
        assert!(!filter.matches(&dated));
    }

    #[test]
    fn test_search() {
        let owner = UserId::new();
        let mut t = task(owner, "Write report");
        t.description = TaskDescription::new("quarterly numbers").unwrap();

        let mut filter = TaskFilter::for_owner(owner);
        filter.search = SearchText::new("budget numbers");
        assert!(filter.matches(&t));

        filter.search = SearchText::new("budget");
        assert!(!filter.matches(&t));
    }

    #[test]
    fn test_sort_by_priority_rank_desc() {
        let owner = UserId::new();
        let mut low = task(owner, "low");
        low.priority = TaskPriority::Low;
        let mut urgent = task(owner, "urgent");
        urgent.priority = TaskPriority::Urgent;

        let sort = TaskSort {
            field: SortField::Priority,
            order: SortOrder::Desc,
        };
        let mut tasks = [low.clone(), urgent.clone()];
        tasks.sort_by(|a, b| sort.compare(a, b));
        assert_eq!(tasks[0].task_id, urgent.task_id);
    }

    #[test]
    fn test_sort_due_date_nulls_first_when_ascending() {
        let owner = UserId::new();
        let undated = task(owner, "undated");
        let mut dated = task(owner, "dated");
        dated.due_date = Some(Utc::now());

        let asc = TaskSort {
            field: SortField::DueDate,
            order: SortOrder::Asc,
        };
        assert_eq!(asc.compare(&undated, &dated), Ordering::Less);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let owner = UserId::new();
        let now = Utc::now();
        let mut a = task(owner, "same");
        let mut b = task(owner, "same");
        a.created_at = now;
        b.created_at = now;

        let sort = TaskSort::default();
        assert_ne!(sort.compare(&a, &b), Ordering::Equal);
        assert_eq!(sort.compare(&a, &b), sort.compare(&b, &a).reverse());
    }

    #[test]
    fn test_sort_params() {
        assert_eq!(SortField::from_param("dueDate"), Some(SortField::DueDate));
        assert_eq!(SortField::from_param("owner"), None);
        assert_eq!(SortOrder::from_param("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_param("ASC"), None);
        assert_eq!(TaskSort::default().field, SortField::CreatedAt);
        assert_eq!(TaskSort::default().order, SortOrder::Desc);
    }
}
