use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::task::TaskSubmission;

/// Repository trait for proof submissions
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: &TaskSubmission) -> DomainResult<Uuid>;

    /// All submissions for a task, oldest first
    async fn list_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskSubmission>>;

    /// The most recent submission still awaiting review, if any
    async fn find_pending(&self, task_id: Uuid) -> DomainResult<Option<TaskSubmission>>;

    /// Persist the review outcome (status, approver, rejection reason)
    async fn record_review(&self, submission: &TaskSubmission) -> DomainResult<()>;
}
