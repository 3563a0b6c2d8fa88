use rust_decimal::Decimal;
use serde::Serialize;

use super::task::{Task, TaskStatus};
use super::user::BankInfo;

/// Read-only earnings summary derived from a user's tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSummary {
    pub total_earned: Decimal,
    pub total_paid: Decimal,
    pub pending_payout: Decimal,
    pub bank_info: Option<BankInfo>,
}

impl PaymentSummary {
    /// Aggregates verified rewards
    ///
    /// `total_paid` comes from payout records and counts as zero when
    /// there are none.
    ///
    /// # Example
    /// ```
    /// use rust_decimal::Decimal;
    /// use taskboard_api::domain::payment::PaymentSummary;
    ///
    /// let summary = PaymentSummary::from_tasks(&[], None, None);
    /// assert_eq!(summary.total_earned, Decimal::ZERO);
    /// assert_eq!(summary.pending_payout, Decimal::ZERO);
    /// ```
    pub fn from_tasks(
        tasks: &[Task],
        total_paid: Option<Decimal>,
        bank_info: Option<BankInfo>,
    ) -> Self {
        let total_earned = total_earned(tasks);
        let total_paid = total_paid.unwrap_or(Decimal::ZERO);
        Self {
            total_earned,
            total_paid,
            pending_payout: total_earned.saturating_sub(total_paid),
            bank_info,
        }
    }
}

/// Sum of rewards over verified tasks
///
/// Saturates at `Decimal::MAX` instead of overflowing.
pub fn total_earned<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Decimal {
    let total = tasks
        .into_iter()
        .filter(|t| t.status() == TaskStatus::Verified)
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.reward().amount()));
    match total {
        Some(total) => total,
        None => {
            tracing::error!("Verified rewards overflow a decimal, reporting the maximum");
            Decimal::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{Reward, TaskRecord};
    use crate::domain::user::StateName;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(status: TaskStatus, reward: i64) -> Task {
        task_with_reward(status, Reward::new(Decimal::from(reward)).unwrap())
    }

    fn task_with_reward(status: TaskStatus, reward: Reward) -> Task {
        let now = Utc::now();
        Task::from_persistence(TaskRecord {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: String::new(),
            assigned_to: Uuid::new_v4(),
            assigned_by: Uuid::new_v4(),
            state: StateName::new("Lagos").unwrap(),
            reward,
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
    fn empty_task_set_earns_nothing() {
        assert_eq!(total_earned(&[]), Decimal::ZERO);
    }

    #[test]
    fn single_verified_task() {
        let tasks = [task(TaskStatus::Verified, 5000)];
        assert_eq!(total_earned(&tasks), Decimal::from(5000));
    }

    #[test]
    fn duplicate_rewards_are_each_counted() {
        let tasks = [
            task(TaskStatus::Verified, 250),
            task(TaskStatus::Verified, 250),
            task(TaskStatus::Verified, 250),
        ];
        assert_eq!(total_earned(&tasks), Decimal::from(750));
    }

    #[test]
    fn unverified_tasks_do_not_count() {
        let tasks = [
            task(TaskStatus::Assigned, 100),
            task(TaskStatus::Submitted, 200),
            task(TaskStatus::Approved, 300),
            task(TaskStatus::Verified, 400),
        ];
        assert_eq!(total_earned(&tasks), Decimal::from(400));
    }

    #[test]
    fn pending_payout_subtracts_paid() {
        let tasks = [task(TaskStatus::Verified, 5000), task(TaskStatus::Verified, 1500)];
        let summary = PaymentSummary::from_tasks(&tasks, Some(Decimal::from(2000)), None);

        assert_eq!(summary.total_earned, Decimal::from(6500));
        assert_eq!(summary.total_paid, Decimal::from(2000));
        assert_eq!(summary.pending_payout, Decimal::from(4500));
    }

    #[test]
    fn missing_payout_records_default_to_zero() {
        let tasks = [task(TaskStatus::Verified, 10)];
        let summary = PaymentSummary::from_tasks(&tasks, None, None);
        assert_eq!(summary.total_paid, Decimal::ZERO);
        assert_eq!(summary.pending_payout, Decimal::from(10));
    }

    #[test]
    fn largest_rewards_sum_without_overflow() {
        let max = Reward::new(Reward::MAX).unwrap();
        let tasks: Vec<Task> = (0..1000)
            .map(|_| task_with_reward(TaskStatus::Verified, max))
            .collect();
        assert_eq!(total_earned(&tasks), Reward::MAX * Decimal::from(1000));
    }

    #[test]
    fn overflowing_total_saturates_instead_of_panicking() {
        let huge = Reward::unchecked(Decimal::MAX / Decimal::from(2) + Decimal::ONE);
        let tasks = [
            task_with_reward(TaskStatus::Verified, huge),
            task_with_reward(TaskStatus::Verified, huge),
            task_with_reward(TaskStatus::Verified, huge),
        ];
        assert_eq!(total_earned(&tasks), Decimal::MAX);

        let summary = PaymentSummary::from_tasks(&tasks, Some(Decimal::from(-5)), None);
        assert_eq!(summary.pending_payout, Decimal::MAX);
    }
}
