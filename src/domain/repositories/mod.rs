// Repository interfaces (ports)
// Adapters in the infrastructure layer implement these

use std::sync::Arc;

pub mod payout_repository;
pub mod submission_repository;
pub mod task_repository;
pub mod user_repository;

pub use payout_repository::PayoutRepository;
pub use submission_repository::SubmissionRepository;
pub use task_repository::TaskRepository;
pub use user_repository::UserRepository;

/// The full set of store ports a service needs
#[derive(Clone)]
pub struct Repositories {
    pub tasks: Arc<dyn TaskRepository>,
    pub users: Arc<dyn UserRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub payouts: Arc<dyn PayoutRepository>,
}
