use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::value_objects::{Email, StateName};
use crate::domain::errors::DomainError;

/// Organisational role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    /// Global visibility, performs final verification
    SuperAdmin,
    /// Assigns tasks within one state and reviews submissions
    StateHead,
    /// Performs tasks and submits proof
    TeamMember,
}

impl Role {
    /// Whether users with this role must belong to a state
    pub fn requires_state(&self) -> bool {
        matches!(self, Role::StateHead | Role::TeamMember)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::StateHead => write!(f, "state_head"),
            Role::TeamMember => write!(f, "team_member"),
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "state_head" => Ok(Role::StateHead),
            "team_member" => Ok(Role::TeamMember),
            other => Err(DomainError::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// Bank details a reward is paid out to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
}

impl BankInfo {
    /// True when no field carries any text
    pub fn is_blank(&self) -> bool {
        self.account_name.trim().is_empty()
            && self.account_number.trim().is_empty()
            && self.bank_name.trim().is_empty()
    }
}

/// A registered user
///
/// Built through [`User::register`] so that the state invariant holds:
/// state heads and team members always carry a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub state: Option<StateName>,
    pub bank_info: Option<BankInfo>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Registers a new user, enforcing the role/state invariant
    ///
    /// # Example
    /// ```
    /// use taskboard_api::domain::user::{Role, User};
    /// use taskboard_api::domain::user::value_objects::{Email, StateName};
    ///
    /// let head = User::register(
    ///     Email::new("head@example.com").unwrap(),
    ///     "Ada".to_string(),
    ///     Role::StateHead,
    ///     Some(StateName::new("Lagos").unwrap()),
    /// )
    /// .expect("valid user");
    /// assert_eq!(head.role, Role::StateHead);
    ///
    /// let stateless_member = User::register(
    ///     Email::new("m@example.com").unwrap(),
    ///     "Bo".to_string(),
    ///     Role::TeamMember,
    ///     None,
    /// );
    /// assert!(stateless_member.is_err());
    /// ```
    pub fn register(
        email: Email,
        name: String,
        role: Role,
        state: Option<StateName>,
    ) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Name cannot be empty".to_string()));
        }
        if role.requires_state() && state.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "A {} must belong to a state",
                role
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            name,
            role,
            state,
            bank_info: None,
            created_at: Utc::now(),
        })
    }

    /// Applies a validated settings update
    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        self.name = update.name.clone();
        self.email = update.email.clone();
        self.bank_info = update.bank_info.clone().filter(|info| !info.is_blank());
    }
}

/// Settings a user may change about themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: Email,
    pub bank_info: Option<BankInfo>,
}

impl ProfileUpdate {
    pub fn new(
        name: String,
        email: Email,
        bank_info: Option<BankInfo>,
    ) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Name cannot be empty".to_string()));
        }
        Ok(Self {
            name,
            email,
            bank_info,
        })
    }
}
