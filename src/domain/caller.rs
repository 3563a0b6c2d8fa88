use uuid::Uuid;

use super::errors::DomainError;
use super::user::{Role, StateName, User};

/// The authenticated identity an operation runs on behalf of
///
/// Every lifecycle and visibility call receives the caller explicitly.
/// Each variant carries exactly the data its rules need, so a state head
/// or team member without a state cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    SuperAdmin { id: Uuid },
    StateHead { id: Uuid, state: StateName },
    TeamMember { id: Uuid, state: StateName },
}

impl Caller {
    /// Builds a caller from an auth profile `{id, role, state}`
    ///
    /// # Example
    /// ```
    /// use taskboard_api::domain::caller::Caller;
    /// use taskboard_api::domain::user::Role;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::new_v4();
    /// let caller = Caller::from_profile(id, Role::TeamMember, Some("Kano")).unwrap();
    /// assert_eq!(caller.id(), id);
    /// assert!(Caller::from_profile(id, Role::StateHead, None).is_err());
    /// ```
    pub fn from_profile(id: Uuid, role: Role, state: Option<&str>) -> Result<Self, DomainError> {
        let state = state.map(StateName::new).transpose()?;
        match (role, state) {
            (Role::SuperAdmin, _) => Ok(Caller::SuperAdmin { id }),
            (Role::StateHead, Some(state)) => Ok(Caller::StateHead { id, state }),
            (Role::TeamMember, Some(state)) => Ok(Caller::TeamMember { id, state }),
            (role, None) => Err(DomainError::InvalidInput(format!(
                "A {} must belong to a state",
                role
            ))),
        }
    }

    pub fn from_user(user: &User) -> Result<Self, DomainError> {
        Self::from_profile(user.id, user.role, user.state.as_ref().map(StateName::as_str))
    }

    pub fn id(&self) -> Uuid {
        match self {
            Caller::SuperAdmin { id }
            | Caller::StateHead { id, .. }
            | Caller::TeamMember { id, .. } => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Caller::SuperAdmin { .. } => Role::SuperAdmin,
            Caller::StateHead { .. } => Role::StateHead,
            Caller::TeamMember { .. } => Role::TeamMember,
        }
    }

    pub fn state(&self) -> Option<&StateName> {
        match self {
            Caller::SuperAdmin { .. } => None,
            Caller::StateHead { state, .. } | Caller::TeamMember { state, .. } => Some(state),
        }
    }

    /// Whether this caller may review (approve or reject) work in `state`
    pub fn reviews_state(&self, state: &StateName) -> bool {
        match self {
            Caller::SuperAdmin { .. } => true,
            Caller::StateHead { state: own, .. } => own == state,
            Caller::TeamMember { .. } => false,
        }
    }
}
