use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::events::TaskEvent;
use super::value_objects::{Reward, TaskAction, TaskStatus};
use crate::domain::caller::Caller;
use crate::domain::errors::DomainError;
use crate::domain::user::{Role, StateName, User};

/// Input for assigning a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub reward: Reward,
    /// `None` means "not set"; it never invalidates a task
    pub due_date: Option<NaiveDate>,
}

/// The fields a status transition is allowed to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: TaskStatus,
    pub updated_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// Stored shape of a task, used to rebuild the aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
    pub state: StateName,
    pub reward: Reward,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// Task aggregate root
///
/// A unit of work a state head assigns to one team member of their state.
/// Enforces the lifecycle and who may trigger each edge.
///
/// # Invariants
/// - `state` equals the assigning state head's state
/// - Reward is never negative
/// - Status only moves along the edges of [`TaskAction`]
/// - A rejected transition leaves every field untouched
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use taskboard_api::domain::caller::Caller;
/// use taskboard_api::domain::task::{NewTask, Task, TaskStatus};
/// use taskboard_api::domain::task::value_objects::Reward;
/// use taskboard_api::domain::user::{Email, Role, StateName, User};
///
/// let lagos = StateName::new("Lagos").unwrap();
/// let member = User::register(
///     Email::new("m@example.com").unwrap(),
///     "Member".to_string(),
///     Role::TeamMember,
///     Some(lagos.clone()),
/// )
/// .unwrap();
/// let head = Caller::StateHead { id: uuid::Uuid::new_v4(), state: lagos };
///
/// let (task, events) = Task::assign(
///     &head,
///     &member,
///     NewTask {
///         title: "Canvass ward 4".to_string(),
///         description: String::new(),
///         assigned_to: member.id,
///         reward: Reward::new(Decimal::from(5000)).unwrap(),
///         due_date: None,
///     },
///     chrono::Utc::now(),
/// )
/// .expect("valid task");
///
/// assert_eq!(task.status(), TaskStatus::Assigned);
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: Uuid,
    title: String,
    description: String,
    assigned_to: Uuid,
    assigned_by: Uuid,
    state: StateName,
    reward: Reward,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    verified_by: Option<Uuid>,
    verified_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task assigned by a state head
    ///
    /// # Business Rules Enforced
    /// - Only a state head may assign (`InvalidTransition` otherwise)
    /// - Title must not be blank
    /// - The assignee must be a team member of the head's state
    /// - The task inherits the head's state
    pub fn assign(
        caller: &Caller,
        assignee: &User,
        new: NewTask,
        now: DateTime<Utc>,
    ) -> Result<(Self, Vec<TaskEvent>), DomainError> {
        let (head_id, state) = match caller {
            Caller::StateHead { id, state } => (*id, state.clone()),
            Caller::SuperAdmin { .. } | Caller::TeamMember { .. } => {
                return Err(DomainError::invalid_transition(
                    TaskAction::Create,
                    "only a state head can assign tasks",
                ));
            }
        };

        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }

        if assignee.id != new.assigned_to {
            return Err(DomainError::InvalidInput(format!(
                "Assignee record {} does not match requested assignee {}",
                assignee.id, new.assigned_to
            )));
        }
        if assignee.role != Role::TeamMember || assignee.state.as_ref() != Some(&state) {
            return Err(DomainError::InvalidInput(format!(
                "Assignee must be a team member in {}",
                state
            )));
        }

        let task = Self {
            id: Uuid::new_v4(),
            title,
            description: new.description.trim().to_string(),
            assigned_to: new.assigned_to,
            assigned_by: head_id,
            state,
            reward: new.reward,
            status: TaskStatus::Assigned,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
            approved_by: None,
            approved_at: None,
            verified_by: None,
            verified_at: None,
        };

        let events = vec![TaskEvent::Assigned {
            task_id: task.id,
            assigned_to: task.assigned_to,
            assigned_by: task.assigned_by,
            state: task.state.clone(),
            reward: task.reward,
        }];

        Ok((task, events))
    }

    /// Assignee hands in proof (assigned -> submitted)
    pub fn submit(&mut self, caller: &Caller, now: DateTime<Utc>) -> Result<TaskEvent, DomainError> {
        self.check(TaskAction::Submit, caller)?;

        self.status = TaskStatus::Submitted;
        self.updated_at = now;

        Ok(TaskEvent::Submitted {
            task_id: self.id,
            submitted_by: caller.id(),
        })
    }

    /// Reviewer accepts the submission (submitted -> approved)
    pub fn approve(&mut self, caller: &Caller, now: DateTime<Utc>) -> Result<TaskEvent, DomainError> {
        self.check(TaskAction::Approve, caller)?;

        self.status = TaskStatus::Approved;
        self.updated_at = now;
        self.approved_by = Some(caller.id());
        self.approved_at = Some(now);

        Ok(TaskEvent::Approved {
            task_id: self.id,
            approved_by: caller.id(),
        })
    }

    /// Reviewer sends the task back to its assignee (submitted -> assigned)
    ///
    /// Reward, assignee and due date are left as they were.
    pub fn reject(
        &mut self,
        caller: &Caller,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TaskEvent, DomainError> {
        self.check(TaskAction::Reject, caller)?;

        self.status = TaskStatus::Assigned;
        self.updated_at = now;

        Ok(TaskEvent::Rejected {
            task_id: self.id,
            rejected_by: caller.id(),
            reason,
        })
    }

    /// Super admin verifies the work (submitted | approved -> verified)
    pub fn verify(&mut self, caller: &Caller, now: DateTime<Utc>) -> Result<TaskEvent, DomainError> {
        self.check(TaskAction::Verify, caller)?;

        self.status = TaskStatus::Verified;
        self.updated_at = now;
        self.verified_by = Some(caller.id());
        self.verified_at = Some(now);

        Ok(TaskEvent::Verified {
            task_id: self.id,
            verified_by: caller.id(),
            reward: self.reward,
        })
    }

    /// Role and source-status guard shared by every transition
    fn check(&self, action: TaskAction, caller: &Caller) -> Result<(), DomainError> {
        let permitted = match action {
            TaskAction::Create => false,
            TaskAction::Submit => caller.id() == self.assigned_to,
            TaskAction::Approve | TaskAction::Reject => caller.reviews_state(&self.state),
            TaskAction::Verify => matches!(caller, Caller::SuperAdmin { .. }),
        };

        if !permitted {
            let reason = match action {
                TaskAction::Create => "task already exists".to_string(),
                TaskAction::Submit => "only the assignee can submit proof".to_string(),
                TaskAction::Approve | TaskAction::Reject => format!(
                    "only the {} state head or a super admin can review this task",
                    self.state
                ),
                TaskAction::Verify => "only a super admin can verify tasks".to_string(),
            };
            return Err(DomainError::invalid_transition(action, reason));
        }

        if !action.accepts(self.status) {
            return Err(DomainError::invalid_transition(
                action,
                format!("task is {}", self.status),
            ));
        }

        Ok(())
    }

    /// Fields to persist after a transition
    pub fn status_update(&self) -> StatusUpdate {
        StatusUpdate {
            status: self.status,
            updated_at: self.updated_at,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            verified_by: self.verified_by,
            verified_at: self.verified_at,
        }
    }

    /// Writes stored transition fields back onto the aggregate
    pub fn apply_status_update(&mut self, update: &StatusUpdate) {
        self.status = update.status;
        self.updated_at = update.updated_at;
        self.approved_by = update.approved_by;
        self.approved_at = update.approved_at;
        self.verified_by = update.verified_by;
        self.verified_at = update.verified_at;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn assigned_to(&self) -> Uuid {
        self.assigned_to
    }

    pub fn assigned_by(&self) -> Uuid {
        self.assigned_by
    }

    pub fn state(&self) -> &StateName {
        &self.state
    }

    pub fn reward(&self) -> Reward {
        self.reward
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn approved_by(&self) -> Option<Uuid> {
        self.approved_by
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn verified_by(&self) -> Option<Uuid> {
        self.verified_by
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Reconstructs a Task from persistence layer data
    ///
    /// Bypasses business rule validation; only repository
    /// implementations should call this.
    pub fn from_persistence(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            assigned_to: record.assigned_to,
            assigned_by: record.assigned_by,
            state: record.state,
            reward: record.reward,
            status: record.status,
            due_date: record.due_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
            approved_by: record.approved_by,
            approved_at: record.approved_at,
            verified_by: record.verified_by,
            verified_at: record.verified_at,
        }
    }
}
