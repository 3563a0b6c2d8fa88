// Task domain module
// Contains the task aggregate root, its submissions, value objects, and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod submission;
pub mod task;
pub mod value_objects;

// Re-export main types for convenience
pub use events::TaskEvent;
pub use submission::{SubmissionStatus, TaskSubmission};
pub use task::{NewTask, StatusUpdate, Task, TaskRecord};
pub use value_objects::{Reward, TaskAction, TaskStatus};
