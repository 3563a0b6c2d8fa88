use thiserror::Error;
use uuid::Uuid;

use super::task::value_objects::TaskAction;

/// Errors raised by the task board domain and its store ports
///
/// Every failure is scoped to the single requested operation; none of
/// these are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Wrong source status, or a caller without the role the edge requires
    #[error("Cannot {action} task: {reason}")]
    InvalidTransition { action: TaskAction, reason: String },

    /// Malformed or missing input (negative reward, empty title, bad email)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced task, user or submission does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// Caller's role does not grant access to a read model
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Transient failure talking to the backing store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn invalid_transition(action: TaskAction, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action,
            reason: reason.into(),
        }
    }

    pub fn task_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "Task", id }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "User", id }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
