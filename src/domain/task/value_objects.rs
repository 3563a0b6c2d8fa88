use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Represents the lifecycle status of a task
///
/// # Status Transitions
/// ```text
/// assigned -> submitted -> approved -> verified
///    ^            |  \____________________^
///    \__ reject __/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
pub enum TaskStatus {
    /// Assigned to a team member, awaiting proof
    Assigned,
    /// Proof submitted, awaiting review
    Submitted,
    /// Approved by a reviewer, awaiting verification
    Approved,
    /// Verified by a super admin; the reward is payable
    Verified,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Assigned,
        TaskStatus::Submitted,
        TaskStatus::Approved,
        TaskStatus::Verified,
    ];

    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Assigned -> Submitted
    /// - Submitted -> Approved
    /// - Submitted -> Assigned (reject)
    /// - Submitted -> Verified
    /// - Approved -> Verified
    ///
    /// # Example
    /// ```
    /// use taskboard_api::domain::task::value_objects::TaskStatus;
    ///
    /// assert!(TaskStatus::Assigned.can_transition_to(TaskStatus::Submitted));
    /// assert!(!TaskStatus::Verified.can_transition_to(TaskStatus::Assigned));
    /// ```
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Assigned, Submitted)
                | (Submitted, Approved)
                | (Submitted, Assigned)
                | (Submitted, Verified)
                | (Approved, Verified)
        )
    }

    /// Still waiting on the assignee or a reviewer
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Assigned | TaskStatus::Submitted)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Assigned => write!(f, "assigned"),
            TaskStatus::Submitted => write!(f, "submitted"),
            TaskStatus::Approved => write!(f, "approved"),
            TaskStatus::Verified => write!(f, "verified"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(TaskStatus::Assigned),
            "submitted" => Ok(TaskStatus::Submitted),
            "approved" => Ok(TaskStatus::Approved),
            "verified" => Ok(TaskStatus::Verified),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown task status: {}",
                other
            ))),
        }
    }
}

/// The operations that move a task through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    Create,
    Submit,
    Approve,
    Reject,
    Verify,
}

impl TaskAction {
    pub const TRANSITIONS: [TaskAction; 4] = [
        TaskAction::Submit,
        TaskAction::Approve,
        TaskAction::Reject,
        TaskAction::Verify,
    ];

    /// Statuses this action may start from. Empty for `Create`.
    pub fn sources(&self) -> &'static [TaskStatus] {
        match self {
            TaskAction::Create => &[],
            TaskAction::Submit => &[TaskStatus::Assigned],
            TaskAction::Approve | TaskAction::Reject => &[TaskStatus::Submitted],
            TaskAction::Verify => &[TaskStatus::Submitted, TaskStatus::Approved],
        }
    }

    /// Status a task holds after this action succeeds
    pub fn target(&self) -> TaskStatus {
        match self {
            TaskAction::Create | TaskAction::Reject => TaskStatus::Assigned,
            TaskAction::Submit => TaskStatus::Submitted,
            TaskAction::Approve => TaskStatus::Approved,
            TaskAction::Verify => TaskStatus::Verified,
        }
    }

    pub fn accepts(&self, from: TaskStatus) -> bool {
        self.sources().contains(&from) && from.can_transition_to(self.target())
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAction::Create => write!(f, "create"),
            TaskAction::Submit => write!(f, "submit"),
            TaskAction::Approve => write!(f, "approve"),
            TaskAction::Reject => write!(f, "reject"),
            TaskAction::Verify => write!(f, "verify"),
        }
    }
}

/// Reward paid out once a task is verified
///
/// # Invariants
/// - Never negative (zero is allowed)
/// - At most two decimal places and at most [`Reward::MAX`], the range of
///   the `NUMERIC(14, 2)` column
/// - Stored without trailing zeros, so every store yields the same value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Reward(Decimal);

impl Reward {
    pub const ZERO: Reward = Reward(Decimal::ZERO);

    /// Largest reward a task can carry: 999,999,999,999.99
    pub const MAX: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

    /// Creates a reward, rejecting negative, oversized, or sub-cent amounts
    ///
    /// # Example
    /// ```
    /// use rust_decimal::Decimal;
    /// use taskboard_api::domain::task::value_objects::Reward;
    ///
    /// assert!(Reward::new(Decimal::from(5000)).is_ok());
    /// assert!(Reward::new(Decimal::ZERO).is_ok());
    /// assert!(Reward::new(Decimal::from(-1)).is_err());
    /// assert!(Reward::new(Decimal::new(5, 3)).is_err());
    /// ```
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        let amount = amount.normalize();
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::InvalidInput(format!(
                "Reward must not be negative: {}",
                amount
            )));
        }
        if amount.scale() > 2 {
            return Err(DomainError::InvalidInput(format!(
                "Reward cannot have more than two decimal places: {}",
                amount
            )));
        }
        if amount > Self::MAX {
            return Err(DomainError::InvalidInput(format!(
                "Reward must not exceed {}: {}",
                Self::MAX,
                amount
            )));
        }
        Ok(Reward(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Bypasses validation to build amounts no store can hold
    #[cfg(test)]
    pub(crate) fn unchecked(amount: Decimal) -> Self {
        Reward(amount)
    }
}

impl FromStr for Reward {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| DomainError::InvalidInput(format!("Reward is not a number: {:?}", s)))?;
        Reward::new(amount)
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(TaskStatus::Assigned.can_transition_to(TaskStatus::Submitted));
        assert!(TaskStatus::Submitted.can_transition_to(TaskStatus::Approved));
        assert!(TaskStatus::Submitted.can_transition_to(TaskStatus::Assigned));
        assert!(TaskStatus::Submitted.can_transition_to(TaskStatus::Verified));
        assert!(TaskStatus::Approved.can_transition_to(TaskStatus::Verified));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!TaskStatus::Assigned.can_transition_to(TaskStatus::Approved));
        assert!(!TaskStatus::Assigned.can_transition_to(TaskStatus::Verified));
        assert!(!TaskStatus::Approved.can_transition_to(TaskStatus::Assigned));
        assert!(!TaskStatus::Approved.can_transition_to(TaskStatus::Submitted));
        for next in TaskStatus::ALL {
            assert!(!TaskStatus::Verified.can_transition_to(next));
        }
    }

    #[test]
    fn no_self_transitions() {
        for status in TaskStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn every_action_edge_is_in_the_status_graph() {
        for action in TaskAction::TRANSITIONS {
            for from in action.sources() {
                assert!(from.can_transition_to(action.target()), "{} from {}", action, from);
            }
        }
    }

    #[test]
    fn status_display_and_parse() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("rejected".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn pending_statuses() {
        assert!(TaskStatus::Assigned.is_pending());
        assert!(TaskStatus::Submitted.is_pending());
        assert!(!TaskStatus::Approved.is_pending());
        assert!(!TaskStatus::Verified.is_pending());
    }

    #[test]
    fn reward_parses_numbers() {
        assert_eq!("5000".parse::<Reward>().unwrap().amount(), Decimal::from(5000));
        assert_eq!(" 12.50 ".parse::<Reward>().unwrap().amount(), Decimal::new(1250, 2));
        assert_eq!("0".parse::<Reward>().unwrap(), Reward::ZERO);
    }

    #[test]
    fn reward_rejects_negative_and_non_numeric() {
        assert!(matches!("-1".parse::<Reward>(), Err(DomainError::InvalidInput(_))));
        assert!(matches!("five".parse::<Reward>(), Err(DomainError::InvalidInput(_))));
        assert!(matches!("".parse::<Reward>(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn reward_rejects_sub_cent_amounts() {
        assert!(matches!("0.005".parse::<Reward>(), Err(DomainError::InvalidInput(_))));
        assert!(matches!("12.345".parse::<Reward>(), Err(DomainError::InvalidInput(_))));
        // Trailing zeros are not extra precision
        assert_eq!("12.500".parse::<Reward>().unwrap().amount(), Decimal::new(125, 1));
        assert_eq!("0.01".parse::<Reward>().unwrap().amount(), Decimal::new(1, 2));
    }

    #[test]
    fn reward_rejects_amounts_beyond_the_column_range() {
        assert_eq!(Reward::MAX, "999999999999.99".parse::<Decimal>().unwrap());
        assert!("999999999999.99".parse::<Reward>().is_ok());
        assert!(matches!(
            "1000000000000".parse::<Reward>(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            "99999999999999999999".parse::<Reward>(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(Reward::new(Decimal::MAX), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn reward_is_stored_without_trailing_zeros() {
        let reward = "5000.00".parse::<Reward>().unwrap();
        assert_eq!(reward.to_string(), "5000");
        assert_eq!(reward.amount().scale(), 0);
    }
}
