//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::task::Task;
use crate::domain::query::{SortField, SortOrder, TaskFilter, TaskQuery, TaskSort};
use crate::domain::repository::{PriorityCount, StatusCount, TaskRepository};
use crate::domain::value_object::{
    TaskDescription, TaskId, TaskPriority, TaskStatus, TaskTags, TaskTitle, UserId,
};
use crate::error::{TaskError, TaskResult};

const TASK_COLUMNS: &str = r#"
    task_id,
    user_id,
    title,
    description,
    status,
    priority,
    tags,
    due_date,
    completed_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed task repository
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `WHERE` clause; the owner predicate always comes first
    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &TaskFilter) {
        builder
            .push(" WHERE user_id = ")
            .push_bind(*filter.owner().as_uuid());

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.code());
        }
        if let Some(priority) = filter.priority {
            builder.push(" AND priority = ").push_bind(priority.rank());
        }
        if !filter.tags.is_empty() {
            builder.push(" AND tags && ").push_bind(filter.tags.clone());
        }
        if let Some(before) = filter.due_before {
            builder.push(" AND due_date <= ").push_bind(before);
        }
        if let Some(after) = filter.due_after {
            builder.push(" AND due_date >= ").push_bind(after);
        }
        if let Some(search) = &filter.search {
            builder
                .push(" AND search_vector @@ to_tsquery('simple', ")
                .push_bind(search.to_tsquery())
                .push(")");
        }
    }

    /// `ORDER BY` clause matching [`TaskSort::compare`]
    fn push_sort(builder: &mut QueryBuilder<'_, Postgres>, sort: &TaskSort) {
        let column = match sort.field {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::DueDate => "due_date",
            SortField::Priority => "priority",
            SortField::Title => "title COLLATE \"C\"",
        };
        let (direction, nulls) = match sort.order {
            SortOrder::Asc => ("ASC", "NULLS FIRST"),
            SortOrder::Desc => ("DESC", "NULLS LAST"),
        };

        builder
            .push(" ORDER BY ")
            .push(column)
            .push(" ")
            .push(direction)
            .push(" ")
            .push(nulls)
            .push(", task_id ")
            .push(direction);
    }
}

impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: &Task) -> TaskResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                task_id,
                user_id,
                title,
                description,
                status,
                priority,
                tags,
                due_date,
                completed_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(task.task_id.as_uuid())
        .bind(task.owner.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_str())
        .bind(task.status.code())
        .bind(task.priority.rank())
        .bind(task.tags.as_slice())
        .bind(task.due_date)
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = $1 AND user_id = $2"
        ))
        .bind(task_id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn update(&self, task: &Task) -> TaskResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                title = $3,
                description = $4,
                status = $5,
                priority = $6,
                tags = $7,
                due_date = $8,
                completed_at = $9,
                updated_at = $10
            WHERE task_id = $1 AND user_id = $2
            "#,
        )
        .bind(task.task_id.as_uuid())
        .bind(task.owner.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_str())
        .bind(task.status.code())
        .bind(task.priority.rank())
        .bind(task.tags.as_slice())
        .bind(task.due_date)
        .bind(task.completed_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, task_id: &TaskId, owner: &UserId) -> TaskResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1 AND user_id = $2")
            .bind(task_id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_status(&self, owner: &UserId, status: TaskStatus) -> TaskResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND status = $2")
            .bind(owner.as_uuid())
            .bind(status.code())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_page(&self, query: &TaskQuery) -> TaskResult<Vec<Task>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));
        Self::push_filter(&mut builder, &query.filter);
        Self::push_sort(&mut builder, &query.sort);
        builder
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let rows = builder
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn count(&self, filter: &TaskFilter) -> TaskResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        Self::push_filter(&mut builder, filter);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total.max(0) as u64)
    }

    async fn count_by_status(&self, owner: &UserId) -> TaskResult<Vec<StatusCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM tasks WHERE user_id = $1 GROUP BY status",
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut groups = rows
            .into_iter()
            .map(|(code, count)| {
                let status = TaskStatus::from_code(&code)
                    .ok_or_else(|| TaskError::Internal(format!("Invalid status: {code}")))?;
                Ok(StatusCount {
                    status,
                    count: count.max(0) as u64,
                })
            })
            .collect::<TaskResult<Vec<_>>>()?;
        groups.sort_by_key(|group| group.status);

        Ok(groups)
    }

    async fn count_by_priority(&self, owner: &UserId) -> TaskResult<Vec<PriorityCount>> {
        let rows: Vec<(i16, i64)> = sqlx::query_as(
            r#"
            SELECT priority, COUNT(*) FROM tasks
            WHERE user_id = $1
            GROUP BY priority
            ORDER BY priority
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(rank, count)| {
                let priority = TaskPriority::from_rank(rank)
                    .ok_or_else(|| TaskError::Internal(format!("Invalid priority rank: {rank}")))?;
                Ok(PriorityCount {
                    priority,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }

    async fn count_overdue(&self, owner: &UserId, now: DateTime<Utc>) -> TaskResult<u64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1 AND status <> 'completed' AND due_date < $2
            "#,
        )
        .bind(owner.as_uuid())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.max(0) as u64)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TaskRow {
    task_id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    status: String,
    priority: i16,
    tags: Vec<String>,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> TaskResult<Task> {
        let status = TaskStatus::from_code(&self.status)
            .ok_or_else(|| TaskError::Internal(format!("Invalid status: {}", self.status)))?;
        let priority = TaskPriority::from_rank(self.priority)
            .ok_or_else(|| TaskError::Internal(format!("Invalid priority rank: {}", self.priority)))?;

        Ok(Task {
            task_id: TaskId::from_uuid(self.task_id),
            owner: UserId::from_uuid(self.user_id),
            title: TaskTitle::from_db(self.title),
            description: TaskDescription::from_db(self.description),
            status,
            priority,
            tags: TaskTags::from_db(self.tags),
            due_date: self.due_date,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
