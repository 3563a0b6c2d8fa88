use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Review state of a single proof submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Approved,
    Rejected,
}

/// Proof of completion handed in by a task's assignee
///
/// `proof_files` holds opaque references into blob storage; the files
/// themselves live outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSubmission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub proof_text: String,
    pub proof_files: Vec<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl TaskSubmission {
    /// Creates a pending submission for `task_id`
    ///
    /// Proof text is required; blank file references are dropped.
    pub fn new(
        task_id: Uuid,
        user_id: Uuid,
        proof_text: String,
        proof_files: Vec<String>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let proof_text = proof_text.trim().to_string();
        if proof_text.is_empty() {
            return Err(DomainError::InvalidInput(
                "Proof description cannot be empty".to_string(),
            ));
        }

        let proof_files = proof_files
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            proof_text,
            proof_files,
            submitted_at,
            status: SubmissionStatus::Submitted,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
        })
    }

    pub fn approve(&mut self, reviewer: Uuid, at: DateTime<Utc>) {
        self.status = SubmissionStatus::Approved;
        self.approved_by = Some(reviewer);
        self.approved_at = Some(at);
        self.rejection_reason = None;
    }

    pub fn reject(&mut self, reason: Option<String>) {
        self.status = SubmissionStatus::Rejected;
        self.approved_by = None;
        self.approved_at = None;
        self.rejection_reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }
}
