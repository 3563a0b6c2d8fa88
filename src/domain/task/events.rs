use uuid::Uuid;

use super::value_objects::Reward;
use crate::domain::user::StateName;

/// Domain events emitted by the Task aggregate
///
/// One event per successful lifecycle transition. The services log them
/// with structured fields; nothing else consumes them yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// A state head assigned a new task
    Assigned {
        task_id: Uuid,
        assigned_to: Uuid,
        assigned_by: Uuid,
        state: StateName,
        reward: Reward,
    },
    /// The assignee submitted proof of completion
    Submitted { task_id: Uuid, submitted_by: Uuid },
    /// A reviewer accepted the submission
    Approved { task_id: Uuid, approved_by: Uuid },
    /// A reviewer sent the task back to the assignee
    Rejected {
        task_id: Uuid,
        rejected_by: Uuid,
        reason: Option<String>,
    },
    /// A super admin verified the task; its reward is now payable
    Verified {
        task_id: Uuid,
        verified_by: Uuid,
        reward: Reward,
    },
}

impl TaskEvent {
    pub fn task_id(&self) -> Uuid {
        match self {
            TaskEvent::Assigned { task_id, .. }
            | TaskEvent::Submitted { task_id, .. }
            | TaskEvent::Approved { task_id, .. }
            | TaskEvent::Rejected { task_id, .. }
            | TaskEvent::Verified { task_id, .. } => *task_id,
        }
    }

    /// Short name used as the `event` field in logs
    pub fn name(&self) -> &'static str {
        match self {
            TaskEvent::Assigned { .. } => "task.assigned",
            TaskEvent::Submitted { .. } => "task.submitted",
            TaskEvent::Approved { .. } => "task.approved",
            TaskEvent::Rejected { .. } => "task.rejected",
            TaskEvent::Verified { .. } => "task.verified",
        }
    }

    /// The user whose action produced the event
    pub fn actor(&self) -> Uuid {
        match self {
            TaskEvent::Assigned { assigned_by, .. } => *assigned_by,
            TaskEvent::Submitted { submitted_by, .. } => *submitted_by,
            TaskEvent::Approved { approved_by, .. } => *approved_by,
            TaskEvent::Rejected { rejected_by, .. } => *rejected_by,
            TaskEvent::Verified { verified_by, .. } => *verified_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_event_exposes_task_and_actor() {
        let task_id = Uuid::new_v4();
        let reviewer = Uuid::new_v4();
        let event = TaskEvent::Rejected {
            task_id,
            rejected_by: reviewer,
            reason: Some("blurry photo".to_string()),
        };

        assert_eq!(event.task_id(), task_id);
        assert_eq!(event.actor(), reviewer);
        assert_eq!(event.name(), "task.rejected");
    }

    #[test]
    fn verified_event_names() {
        let event = TaskEvent::Verified {
            task_id: Uuid::new_v4(),
            verified_by: Uuid::new_v4(),
            reward: Reward::ZERO,
        };
        assert_eq!(event.name(), "task.verified");
    }
}
