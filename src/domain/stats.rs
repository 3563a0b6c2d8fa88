//! Dashboard and team read models computed from already visible rows.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::caller::Caller;
use super::payment::total_earned;
use super::task::{Task, TaskStatus};
use super::user::{Role, StateName, User};

/// Headline numbers for a caller's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub total_earned: Decimal,
    pub team_members: usize,
}

impl DashboardStats {
    /// `tasks` and `users` must already be narrowed to what `caller` may see
    pub fn compute(caller: &Caller, tasks: &[Task], users: &[User]) -> Self {
        let team_members = match caller {
            Caller::SuperAdmin { .. } => users
                .iter()
                .filter(|u| matches!(u.role, Role::TeamMember | Role::StateHead))
                .count(),
            Caller::StateHead { state, .. } => users
                .iter()
                .filter(|u| u.role == Role::TeamMember && u.state.as_ref() == Some(state))
                .count(),
            Caller::TeamMember { .. } => 0,
        };

        Self {
            total_tasks: tasks.len(),
            completed_tasks: tasks
                .iter()
                .filter(|t| t.status() == TaskStatus::Verified)
                .count(),
            pending_tasks: tasks.iter().filter(|t| t.status().is_pending()).count(),
            total_earned: total_earned(tasks),
            team_members,
        }
    }
}

/// Per-member progress shown to a state head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    pub user_id: Uuid,
    pub name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_earned: Decimal,
    /// Whole percent, rounded half up; 0 when the member has no tasks
    pub completion_rate: u32,
}

impl MemberStats {
    pub fn for_member(member: &User, tasks: &[Task]) -> Self {
        let own: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.assigned_to() == member.id)
            .collect();
        let total_tasks = own.len();
        let completed_tasks = own
            .iter()
            .filter(|t| t.status() == TaskStatus::Verified)
            .count();

        Self {
            user_id: member.id,
            name: member.name.clone(),
            total_tasks,
            completed_tasks,
            total_earned: total_earned(own.iter().copied()),
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (completed * 200 + total) / (total * 2);
    u32::try_from(rate).unwrap_or(u32::MAX)
}

/// Users of one state, as listed on the all-teams page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTeam {
    pub state: StateName,
    pub head: Option<User>,
    pub members: Vec<User>,
}

/// Groups users by state; users without a state are skipped
///
/// If a state has several heads, the first one encountered is kept.
pub fn group_by_state(users: &[User]) -> Vec<StateTeam> {
    let mut grouped: BTreeMap<StateName, StateTeam> = BTreeMap::new();
    for user in users {
        let Some(state) = &user.state else {
            continue;
        };
        let team = grouped.entry(state.clone()).or_insert_with(|| StateTeam {
            state: state.clone(),
            head: None,
            members: Vec::new(),
        });
        match user.role {
            Role::StateHead if team.head.is_none() => team.head = Some(user.clone()),
            Role::TeamMember => team.members.push(user.clone()),
            Role::StateHead | Role::SuperAdmin => {}
        }
    }
    grouped.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{Reward, TaskRecord};
    use crate::domain::user::Email;
    use chrono::Utc;

    fn user(role: Role, state: Option<&str>) -> User {
        User::register(
            Email::new(format!("{}@example.com", Uuid::new_v4())).unwrap(),
            "Person".to_string(),
            role,
            state.map(|s| StateName::new(s).unwrap()),
        )
        .unwrap()
    }

    fn task(assignee: &User, status: TaskStatus, reward: i64) -> Task {
        let now = Utc::now();
        Task::from_persistence(TaskRecord {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: String::new(),
            assigned_to: assignee.id,
            assigned_by: Uuid::new_v4(),
            state: assignee.state.clone().unwrap(),
            reward: Reward::new(Decimal::from(reward)).unwrap(),
            status,
            due_date: None,
            created_at: now,
            updated_at: now,
            approved_by: None,
            approved_at: None,
            verified_by: None,
            verified_at: None,
        })
    }

    #[test]
    fn dashboard_counts() {
        let head = user(Role::StateHead, Some("Lagos"));
        let m1 = user(Role::TeamMember, Some("Lagos"));
        let m2 = user(Role::TeamMember, Some("Lagos"));
        let tasks = vec![
            task(&m1, TaskStatus::Assigned, 10),
            task(&m1, TaskStatus::Submitted, 20),
            task(&m2, TaskStatus::Approved, 30),
            task(&m2, TaskStatus::Verified, 40),
        ];
        let caller = Caller::from_user(&head).unwrap();

        let stats = DashboardStats::compute(&caller, &tasks, &[head.clone(), m1, m2]);

        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.total_earned, Decimal::from(40));
        assert_eq!(stats.team_members, 2);
    }

    #[test]
    fn super_admin_counts_heads_and_members() {
        let admin = user(Role::SuperAdmin, None);
        let users = vec![
            admin.clone(),
            user(Role::StateHead, Some("Kano")),
            user(Role::TeamMember, Some("Kano")),
        ];
        let stats = DashboardStats::compute(&Caller::from_user(&admin).unwrap(), &[], &users);
        assert_eq!(stats.team_members, 2);
    }

    #[test]
    fn team_member_dashboard_has_no_team() {
        let member = user(Role::TeamMember, Some("Kano"));
        let stats = DashboardStats::compute(
            &Caller::from_user(&member).unwrap(),
            &[task(&member, TaskStatus::Verified, 5)],
            &[member.clone()],
        );
        assert_eq!(stats.team_members, 0);
        assert_eq!(stats.total_earned, Decimal::from(5));
    }

    #[test]
    fn member_stats_only_count_own_tasks() {
        let m1 = user(Role::TeamMember, Some("Lagos"));
        let m2 = user(Role::TeamMember, Some("Lagos"));
        let tasks = vec![
            task(&m1, TaskStatus::Verified, 100),
            task(&m1, TaskStatus::Verified, 100),
            task(&m1, TaskStatus::Assigned, 100),
            task(&m2, TaskStatus::Verified, 999),
        ];

        let stats = MemberStats::for_member(&m1, &tasks);

        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.total_earned, Decimal::from(200));
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn completion_rate_rounding() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 2), 50);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(4, 4), 100);
    }

    #[test]
    fn grouping_skips_stateless_users() {
        let users = vec![
            user(Role::SuperAdmin, None),
            user(Role::TeamMember, Some("Lagos")),
            user(Role::StateHead, Some("Lagos")),
            user(Role::TeamMember, Some("Abuja")),
        ];

        let teams = group_by_state(&users);

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].state.as_str(), "Abuja");
        assert!(teams[0].head.is_none());
        assert_eq!(teams[1].state.as_str(), "Lagos");
        assert_eq!(teams[1].head.as_ref().map(|h| h.id), Some(users[2].id));
        assert_eq!(teams[1].members.len(), 1);
    }
}
