//! Task lifecycle orchestration: read, transition in memory, guarded write.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::caller::Caller;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Repositories;
use crate::domain::task::{NewTask, StatusUpdate, Task, TaskAction, TaskEvent, TaskSubmission};

/// Proof handed in with a submit request
#[derive(Debug, Clone, Default)]
pub struct SubmitProof {
    pub proof_text: String,
    pub proof_files: Vec<String>,
}

/// Applies lifecycle transitions and persists them
///
/// Every mutation validates against a freshly read task and writes with a
/// compare-and-set on status. A writer that loses the race fails with
/// `InvalidTransition` and writes nothing.
#[derive(Clone)]
pub struct TaskLifecycleService {
    repos: Repositories,
}

impl TaskLifecycleService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// State head assigns a new task to a team member of their state
    pub async fn create_task(&self, caller: &Caller, new: NewTask) -> DomainResult<Task> {
        if !matches!(caller, Caller::StateHead { .. }) {
            return Err(DomainError::invalid_transition(
                TaskAction::Create,
                "only a state head can assign tasks",
            ));
        }

        let assignee = self
            .repos
            .users
            .find_by_id(new.assigned_to)
            .await?
            .ok_or_else(|| DomainError::user_not_found(new.assigned_to))?;

        let (task, events) = Task::assign(caller, &assignee, new, Utc::now())?;
        self.repos.tasks.create(&task).await?;

        for event in &events {
            log_event(event);
        }
        Ok(task)
    }

    /// Assignee submits proof (assigned -> submitted)
    ///
    /// The submission record is written after the task. If that write fails
    /// the task is put back to `assigned`.
    pub async fn submit(
        &self,
        caller: &Caller,
        task_id: Uuid,
        proof: SubmitProof,
    ) -> DomainResult<Task> {
        let mut task = self.load(task_id).await?;
        let before = task.status_update();

        let event = task.submit(caller, Utc::now())?;
        let submission = TaskSubmission::new(
            task.id(),
            caller.id(),
            proof.proof_text,
            proof.proof_files,
            task.updated_at(),
        )?;

        self.guarded_write(&task, &before, TaskAction::Submit).await?;
        if let Err(e) = self.repos.submissions.create(&submission).await {
            self.compensate(&task, &before).await;
            return Err(e);
        }

        log_event(&event);
        Ok(task)
    }

    /// Reviewer accepts the pending submission (submitted -> approved)
    pub async fn approve(&self, caller: &Caller, task_id: Uuid) -> DomainResult<Task> {
        let mut task = self.load(task_id).await?;
        let before = task.status_update();

        let event = task.approve(caller, Utc::now())?;
        let pending = self.repos.submissions.find_pending(task_id).await?;

        self.guarded_write(&task, &before, TaskAction::Approve)
            .await?;
        if let Some(mut submission) = pending {
            submission.approve(caller.id(), task.updated_at());
            if let Err(e) = self.repos.submissions.record_review(&submission).await {
                self.compensate(&task, &before).await;
                return Err(e);
            }
        }

        log_event(&event);
        Ok(task)
    }

    /// Reviewer sends the task back (submitted -> assigned)
    pub async fn reject(
        &self,
        caller: &Caller,
        task_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<Task> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let mut task = self.load(task_id).await?;
        let before = task.status_update();

        let event = task.reject(caller, reason.clone(), Utc::now())?;
        let pending = self.repos.submissions.find_pending(task_id).await?;

        self.guarded_write(&task, &before, TaskAction::Reject).await?;
        if let Some(mut submission) = pending {
            submission.reject(reason);
            if let Err(e) = self.repos.submissions.record_review(&submission).await {
                self.compensate(&task, &before).await;
                return Err(e);
            }
        }

        log_event(&event);
        Ok(task)
    }

    /// Super admin verifies (submitted | approved -> verified)
    pub async fn verify(&self, caller: &Caller, task_id: Uuid) -> DomainResult<Task> {
        let mut task = self.load(task_id).await?;
        let before = task.status_update();

        let event = task.verify(caller, Utc::now())?;
        self.guarded_write(&task, &before, TaskAction::Verify).await?;

        log_event(&event);
        Ok(task)
    }

    async fn load(&self, task_id: Uuid) -> DomainResult<Task> {
        self.repos
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| DomainError::task_not_found(task_id))
    }

    /// Persists `task`'s new status only if the store still holds `before`
    async fn guarded_write(
        &self,
        task: &Task,
        before: &StatusUpdate,
        action: TaskAction,
    ) -> DomainResult<()> {
        let written = self
            .repos
            .tasks
            .update_status(task.id(), before.status, &task.status_update())
            .await?;
        if !written {
            tracing::warn!(
                task_id = %task.id(),
                action = %action,
                expected = %before.status,
                "Lost guarded write to a concurrent update"
            );
            return Err(DomainError::invalid_transition(
                action,
                "task was changed by another request",
            ));
        }
        Ok(())
    }

    /// Restores the status written by a transition whose follow-up failed
    async fn compensate(&self, task: &Task, before: &StatusUpdate) {
        let restored: DomainResult<bool> = self
            .repos
            .tasks
            .update_status(task.id(), task.status(), before)
            .await;
        match restored {
            Ok(true) => tracing::warn!(
                task_id = %task.id(),
                status = %before.status,
                "Rolled task back after failed follow-up write"
            ),
            Ok(false) => tracing::error!(
                task_id = %task.id(),
                "Task changed again before rollback; left as is"
            ),
            Err(e) => tracing::error!(
                task_id = %task.id(),
                error = %e,
                "Failed to roll task back"
            ),
        }
    }
}

fn log_event(event: &TaskEvent) {
    tracing::info!(
        event = event.name(),
        task_id = %event.task_id(),
        actor = %event.actor(),
        "Task lifecycle event"
    );
}
