use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::domain::errors::DomainResult;
use crate::domain::repositories::SubmissionRepository;
use crate::domain::task::{SubmissionStatus, TaskSubmission};

const SUBMISSION_COLUMNS: &str = "id, task_id, user_id, proof_text, proof_files, submitted_at, \
     status, approved_by, approved_at, rejection_reason";

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    task_id: Uuid,
    user_id: Uuid,
    proof_text: String,
    proof_files: Vec<String>,
    submitted_at: DateTime<Utc>,
    status: SubmissionStatus,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
}

impl From<SubmissionRow> for TaskSubmission {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            task_id: row.task_id,
            user_id: row.user_id,
            proof_text: row.proof_text,
            proof_files: row.proof_files,
            submitted_at: row.submitted_at,
            status: row.status,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            rejection_reason: row.rejection_reason,
        }
    }
}

/// PostgreSQL implementation of SubmissionRepository
pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn create(&self, submission: &TaskSubmission) -> DomainResult<Uuid> {
        sqlx::query(&format!(
            "INSERT INTO submissions ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            SUBMISSION_COLUMNS
        ))
        .bind(submission.id)
        .bind(submission.task_id)
        .bind(submission.user_id)
        .bind(&submission.proof_text)
        .bind(&submission.proof_files)
        .bind(submission.submitted_at)
        .bind(submission.status)
        .bind(submission.approved_by)
        .bind(submission.approved_at)
        .bind(&submission.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to create submission"))?;

        Ok(submission.id)
    }

    async fn list_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskSubmission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM submissions WHERE task_id = $1 ORDER BY submitted_at, id",
            SUBMISSION_COLUMNS
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to list submissions"))?;

        Ok(rows.into_iter().map(TaskSubmission::from).collect())
    }

    async fn find_pending(&self, task_id: Uuid) -> DomainResult<Option<TaskSubmission>> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM submissions \
             WHERE task_id = $1 AND status = $2 \
             ORDER BY submitted_at DESC, id LIMIT 1",
            SUBMISSION_COLUMNS
        ))
        .bind(task_id)
        .bind(SubmissionStatus::Submitted)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find pending submission"))?;

        Ok(row.map(TaskSubmission::from))
    }

    async fn record_review(&self, submission: &TaskSubmission) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE submissions
            SET status = $2, approved_by = $3, approved_at = $4, rejection_reason = $5
            WHERE id = $1
            "#,
        )
        .bind(submission.id)
        .bind(submission.status)
        .bind(submission.approved_by)
        .bind(submission.approved_at)
        .bind(&submission.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to record submission review"))?;

        Ok(())
    }
}
