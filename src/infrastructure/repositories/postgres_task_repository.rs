use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::store_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::TaskRepository;
use crate::domain::task::{Reward, StatusUpdate, Task, TaskRecord, TaskStatus};
use crate::domain::user::StateName;
use crate::domain::visibility::TaskFilter;

const TASK_COLUMNS: &str = "id, title, description, assigned_to, assigned_by, state, reward, \
     status, due_date, created_at, updated_at, approved_by, approved_at, verified_by, verified_at";

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    assigned_to: Uuid,
    assigned_by: Uuid,
    state: String,
    reward: Decimal,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    verified_by: Option<Uuid>,
    verified_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| {
            DomainError::StoreUnavailable(format!("Invalid task {} in database: {}", row.id, e))
        };
        let state = StateName::new(row.state.clone()).map_err(corrupt)?;
        let reward = Reward::new(row.reward).map_err(corrupt)?;

        Ok(Task::from_persistence(TaskRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            assigned_to: row.assigned_to,
            assigned_by: row.assigned_by,
            state,
            reward,
            status: row.status,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            verified_by: row.verified_by,
            verified_at: row.verified_at,
        }))
    }
}

/// Builds the list query for `filter`, newest first
fn task_list_query(filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {} FROM tasks WHERE TRUE", TASK_COLUMNS));
    push_task_filter(&mut query, filter);
    query.push(" ORDER BY created_at DESC, id");
    query
}

/// Translates a [`TaskFilter`] into a WHERE clause
///
/// Mirrors `TaskFilter::matches` field for field.
fn push_task_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &TaskFilter) {
    if filter.match_none {
        query.push(" AND FALSE");
    }
    if let Some(state) = &filter.state {
        query.push(" AND state = ").push_bind(state.as_str().to_string());
    }
    if let Some(assigned_to) = filter.assigned_to {
        query.push(" AND assigned_to = ").push_bind(assigned_to);
    }
    if let Some(assigned_by) = filter.assigned_by {
        query.push(" AND assigned_by = ").push_bind(assigned_by);
    }
    if !filter.statuses.is_empty() {
        query.push(" AND status IN (");
        let mut statuses = query.separated(", ");
        for status in &filter.statuses {
            statuses.push_bind(*status);
        }
        statuses.push_unseparated(")");
    }
}

/// PostgreSQL implementation of TaskRepository
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new PostgresTaskRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        let mut query = task_list_query(filter);
        let rows: Vec<TaskRow> = query
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("Failed to list tasks"))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error("Failed to find task by id"))?;

        row.map(Task::try_from).transpose()
    }

    async fn create(&self, task: &Task) -> DomainResult<Uuid> {
        sqlx::query(&format!(
            "INSERT INTO tasks ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            TASK_COLUMNS
        ))
        .bind(task.id())
        .bind(task.title())
        .bind(task.description())
        .bind(task.assigned_to())
        .bind(task.assigned_by())
        .bind(task.state().as_str())
        .bind(task.reward().amount())
        .bind(task.status())
        .bind(task.due_date())
        .bind(task.created_at())
        .bind(task.updated_at())
        .bind(task.approved_by())
        .bind(task.approved_at())
        .bind(task.verified_by())
        .bind(task.verified_at())
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to create task"))?;

        Ok(task.id())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        update: &StatusUpdate,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = $3, updated_at = $4,
                approved_by = $5, approved_at = $6,
                verified_by = $7, verified_at = $8
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(update.status)
        .bind(update.updated_at)
        .bind(update.approved_by)
        .bind(update.approved_at)
        .bind(update.verified_by)
        .bind(update.verified_at)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to update task status"))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("Failed to check task existence"))?;

        match exists {
            Some(_) => Ok(false),
            None => Err(DomainError::task_not_found(id)),
        }
    }
}
