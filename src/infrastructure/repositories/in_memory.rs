//! In-memory store for tests and local runs without a database.
//!
//! Evaluates visibility filters with the same `matches` predicates the
//! domain exposes, so it selects exactly what the Postgres adapters do.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{
    PayoutRepository, SubmissionRepository, TaskRepository, UserRepository,
};
use crate::domain::task::{StatusUpdate, Task, TaskStatus, TaskSubmission};
use crate::domain::user::{Email, ProfileUpdate, User};
use crate::domain::visibility::{TaskFilter, UserFilter};

/// Thread-safe store implementing every repository port
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<Uuid, Task>,
    users: HashMap<Uuid, UserEntry>,
    submissions: Vec<TaskSubmission>,
    payouts: Vec<(Uuid, Decimal)>,
}

#[derive(Debug)]
struct UserEntry {
    user: User,
    password_hash: String,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a payout made to `user_id`
    pub fn record_payout(&self, user_id: Uuid, amount: Decimal) -> DomainResult<()> {
        self.write()?.payouts.push((user_id, amount));
        Ok(())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }
}

fn email_taken(state: &StoreState, email: &Email, except: Option<Uuid>) -> bool {
    state
        .users
        .values()
        .any(|e| &e.user.email == email && Some(e.user.id) != except)
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn list(&self, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks = filter.apply(state.tasks.values().cloned());
        tasks.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(tasks)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn create(&self, task: &Task) -> DomainResult<Uuid> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(DomainError::InvalidInput(format!(
                "Task {} already exists",
                task.id()
            )));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(task.id())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        update: &StatusUpdate,
    ) -> DomainResult<bool> {
        let mut state = self.write()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| DomainError::task_not_found(id))?;
        if task.status() != expected {
            return Ok(false);
        }
        task.apply_status_update(update);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User, password_hash: &str) -> DomainResult<Uuid> {
        let mut state = self.write()?;
        if email_taken(&state, &user.email, None) {
            return Err(DomainError::InvalidInput(
                "Email already registered".to_string(),
            ));
        }
        state.users.insert(
            user.id,
            UserEntry {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.read()?.users.get(&id).map(|e| e.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> DomainResult<Option<(User, String)>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|e| &e.user.email == email)
            .map(|e| (e.user.clone(), e.password_hash.clone())))
    }

    async fn list(&self, filter: &UserFilter) -> DomainResult<Vec<User>> {
        let state = self.read()?;
        let mut users = filter.apply(state.users.values().map(|e| e.user.clone()));
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> DomainResult<User> {
        let mut state = self.write()?;
        if email_taken(&state, &update.email, Some(id)) {
            return Err(DomainError::InvalidInput(
                "Email already registered".to_string(),
            ));
        }
        let entry = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        entry.user.apply_profile(update);
        Ok(entry.user.clone())
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn create(&self, submission: &TaskSubmission) -> DomainResult<Uuid> {
        self.write()?.submissions.push(submission.clone());
        Ok(submission.id)
    }

    async fn list_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskSubmission>> {
        let mut found: Vec<TaskSubmission> = self
            .read()?
            .submissions
            .iter()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(found)
    }

    async fn find_pending(&self, task_id: Uuid) -> DomainResult<Option<TaskSubmission>> {
        Ok(self
            .read()?
            .submissions
            .iter()
            .filter(|s| s.task_id == task_id && s.is_pending())
            .max_by(|a, b| {
                a.submitted_at
                    .cmp(&b.submitted_at)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .cloned())
    }

    async fn record_review(&self, submission: &TaskSubmission) -> DomainResult<()> {
        let mut state = self.write()?;
        let stored = state
            .submissions
            .iter_mut()
            .find(|s| s.id == submission.id)
            .ok_or(DomainError::NotFound {
                entity: "Submission",
                id: submission.id,
            })?;
        *stored = submission.clone();
        Ok(())
    }
}

#[async_trait]
impl PayoutRepository for InMemoryStore {
    async fn total_paid_to(&self, user_id: Uuid) -> DomainResult<Option<Decimal>> {
        let state = self.read()?;
        let mut paid = state
            .payouts
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, amount)| *amount)
            .peekable();
        if paid.peek().is_none() {
            return Ok(None);
        }
        paid.try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
            .map(Some)
            .ok_or_else(|| DomainError::StoreUnavailable("Payout total overflowed".to_string()))
    }
}
