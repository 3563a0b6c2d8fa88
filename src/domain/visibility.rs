//! Role-scoped visibility rules
//!
//! A caller's view of the store is a plain filter value. Store adapters
//! translate it into a query; [`TaskFilter::matches`] and
//! [`UserFilter::matches`] evaluate the very same value in-process. Both
//! paths must select the same rows, or a caller sees data they should not.

use uuid::Uuid;

use super::caller::Caller;
use super::task::{Task, TaskStatus};
use super::user::{Role, StateName, User};

/// Conjunctive task query: every `Some` field must match
///
/// An empty `statuses` list means "any status". `match_none` is set when
/// narrowing produced a contradiction; such a filter selects no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub state: Option<StateName>,
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub statuses: Vec<TaskStatus>,
    pub match_none: bool,
}

impl TaskFilter {
    /// Matches every task
    pub fn all() -> Self {
        Self::default()
    }

    /// The widest set of tasks `caller` may see
    ///
    /// # Example
    /// ```
    /// use taskboard_api::domain::caller::Caller;
    /// use taskboard_api::domain::user::StateName;
    /// use taskboard_api::domain::visibility::TaskFilter;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::new_v4();
    /// let lagos = StateName::new("Lagos").unwrap();
    /// let filter = TaskFilter::visible_to(&Caller::TeamMember { id, state: lagos.clone() });
    ///
    /// assert_eq!(filter.state, Some(lagos));
    /// assert_eq!(filter.assigned_to, Some(id));
    /// ```
    pub fn visible_to(caller: &Caller) -> Self {
        match caller {
            Caller::SuperAdmin { .. } => Self::all(),
            Caller::StateHead { state, .. } => Self {
                state: Some(state.clone()),
                ..Self::default()
            },
            Caller::TeamMember { id, state } => Self {
                state: Some(state.clone()),
                assigned_to: Some(*id),
                ..Self::default()
            },
        }
    }

    /// Narrows to the given statuses; an empty list keeps the current set
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        let requested: Vec<TaskStatus> = statuses.into_iter().collect();
        if requested.is_empty() {
            return self;
        }
        self.statuses = if self.statuses.is_empty() {
            requested
        } else {
            self.statuses
                .iter()
                .copied()
                .filter(|s| requested.contains(s))
                .collect()
        };
        if self.statuses.is_empty() {
            self.match_none = true;
        }
        self
    }

    /// Narrows to tasks assigned by `user_id`
    pub fn with_assigned_by(mut self, user_id: Uuid) -> Self {
        match self.assigned_by {
            Some(existing) if existing != user_id => self.match_none = true,
            _ => self.assigned_by = Some(user_id),
        }
        self
    }

    /// Narrows to tasks assigned to `user_id`
    pub fn with_assigned_to(mut self, user_id: Uuid) -> Self {
        match self.assigned_to {
            Some(existing) if existing != user_id => self.match_none = true,
            _ => self.assigned_to = Some(user_id),
        }
        self
    }

    /// In-process evaluation of the filter
    pub fn matches(&self, task: &Task) -> bool {
        !self.match_none
            && self.state.as_ref().map_or(true, |s| task.state() == s)
            && self.assigned_to.map_or(true, |id| task.assigned_to() == id)
            && self.assigned_by.map_or(true, |id| task.assigned_by() == id)
            && (self.statuses.is_empty() || self.statuses.contains(&task.status()))
    }

    /// Client-side post-filter over an already fetched list
    pub fn apply(&self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// User query: `(state AND role AND id) OR id == also_include`
///
/// The disjunct lets a state head see their own record next to their
/// team members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub state: Option<StateName>,
    pub role: Option<Role>,
    pub id: Option<Uuid>,
    pub also_include: Option<Uuid>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// The widest set of users `caller` may see
    pub fn visible_to(caller: &Caller) -> Self {
        match caller {
            Caller::SuperAdmin { .. } => Self::all(),
            Caller::StateHead { id, state } => Self {
                state: Some(state.clone()),
                role: Some(Role::TeamMember),
                id: None,
                also_include: Some(*id),
            },
            Caller::TeamMember { id, .. } => Self {
                id: Some(*id),
                ..Self::default()
            },
        }
    }

    /// Team members of one state, without the disjunct
    pub fn team_members_of(state: &StateName) -> Self {
        Self {
            state: Some(state.clone()),
            role: Some(Role::TeamMember),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        let core = self
            .state
            .as_ref()
            .map_or(true, |s| user.state.as_ref() == Some(s))
            && self.role.map_or(true, |r| user.role == r)
            && self.id.map_or(true, |id| user.id == id);
        core || self.also_include == Some(user.id)
    }

    pub fn apply(&self, users: impl IntoIterator<Item = User>) -> Vec<User> {
        users.into_iter().filter(|u| self.matches(u)).collect()
    }
}
