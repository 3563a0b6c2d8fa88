//! Read models scoped by the caller's visibility.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::caller::Caller;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::payment::PaymentSummary;
use crate::domain::repositories::Repositories;
use crate::domain::stats::{group_by_state, DashboardStats, MemberStats, StateTeam};
use crate::domain::task::{Task, TaskStatus, TaskSubmission};
use crate::domain::user::User;
use crate::domain::visibility::{TaskFilter, UserFilter};

/// A single task with its submission history, oldest first
#[derive(Debug, Clone)]
pub struct TaskDetail {
    pub task: Task,
    pub submissions: Vec<TaskSubmission>,
}

/// Earnings summary plus the verified tasks it was computed from
#[derive(Debug, Clone)]
pub struct PaymentOverview {
    pub summary: PaymentSummary,
    pub history: Vec<Task>,
}

/// Dashboard numbers plus the latest visible tasks
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    /// Five most recent visible tasks
    pub recent_task_ids: Vec<Uuid>,
}

const RECENT_TASKS: usize = 5;

/// Every read goes through the caller's visibility filter first
#[derive(Clone)]
pub struct TaskQueryService {
    repos: Repositories,
}

impl TaskQueryService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Tasks the caller may see, optionally narrowed
    ///
    /// `statuses` empty means any status. `assigned_by_me` keeps only tasks
    /// the caller assigned.
    pub async fn visible_tasks(
        &self,
        caller: &Caller,
        statuses: &[TaskStatus],
        assigned_by_me: bool,
    ) -> DomainResult<Vec<Task>> {
        let mut filter = TaskFilter::visible_to(caller).with_statuses(statuses.iter().copied());
        if assigned_by_me {
            filter = filter.with_assigned_by(caller.id());
        }
        self.repos.tasks.list(&filter).await
    }

    /// A visible task and its submissions; invisible tasks are `NotFound`
    pub async fn task_detail(&self, caller: &Caller, task_id: Uuid) -> DomainResult<TaskDetail> {
        let task = self
            .repos
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| TaskFilter::visible_to(caller).matches(t))
            .ok_or_else(|| DomainError::task_not_found(task_id))?;

        let submissions = self.repos.submissions.list_for_task(task_id).await?;
        Ok(TaskDetail { task, submissions })
    }

    pub async fn visible_users(&self, caller: &Caller) -> DomainResult<Vec<User>> {
        self.repos.users.list(&UserFilter::visible_to(caller)).await
    }

    /// Submitted and approved tasks awaiting a super admin
    pub async fn verification_queue(&self, caller: &Caller) -> DomainResult<Vec<Task>> {
        if !matches!(caller, Caller::SuperAdmin { .. }) {
            return Err(DomainError::Forbidden(
                "only a super admin can open the verification queue".to_string(),
            ));
        }
        self.visible_tasks(caller, &[TaskStatus::Submitted, TaskStatus::Approved], false)
            .await
    }

    /// The caller's own earnings
    pub async fn payment_overview(&self, caller: &Caller) -> DomainResult<PaymentOverview> {
        let filter = TaskFilter::visible_to(caller)
            .with_assigned_to(caller.id())
            .with_statuses([TaskStatus::Verified]);
        let history = self.repos.tasks.list(&filter).await?;
        let total_paid = self.repos.payouts.total_paid_to(caller.id()).await?;
        let bank_info = self
            .repos
            .users
            .find_by_id(caller.id())
            .await?
            .and_then(|u| u.bank_info);

        Ok(PaymentOverview {
            summary: PaymentSummary::from_tasks(&history, total_paid, bank_info),
            history,
        })
    }

    pub async fn dashboard(&self, caller: &Caller) -> DomainResult<Dashboard> {
        let tasks = self
            .repos
            .tasks
            .list(&TaskFilter::visible_to(caller))
            .await?;
        let users = self.visible_users(caller).await?;

        Ok(Dashboard {
            stats: DashboardStats::compute(caller, &tasks, &users),
            recent_task_ids: tasks.iter().take(RECENT_TASKS).map(Task::id).collect(),
        })
    }

    /// Per-member progress for a state head's team
    pub async fn team_stats(&self, caller: &Caller) -> DomainResult<Vec<MemberStats>> {
        let Caller::StateHead { state, .. } = caller else {
            return Err(DomainError::Forbidden(
                "only a state head has a team".to_string(),
            ));
        };

        let members = self
            .repos
            .users
            .list(&UserFilter::team_members_of(state))
            .await?;
        let tasks = self
            .repos
            .tasks
            .list(&TaskFilter::visible_to(caller))
            .await?;

        Ok(members
            .iter()
            .map(|m| MemberStats::for_member(m, &tasks))
            .collect())
    }

    /// All users grouped by state
    pub async fn teams_by_state(&self, caller: &Caller) -> DomainResult<Vec<StateTeam>> {
        if !matches!(caller, Caller::SuperAdmin { .. }) {
            return Err(DomainError::Forbidden(
                "only a super admin can list all teams".to_string(),
            ));
        }
        let users = self.visible_users(caller).await?;
        Ok(group_by_state(&users))
    }
}
