use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::task::{StatusUpdate, Task, TaskStatus};
use crate::domain::visibility::TaskFilter;

/// Repository trait for the Task aggregate
///
/// Implementations must evaluate [`TaskFilter`] exactly as
/// [`TaskFilter::matches`] does.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List tasks matching the filter, newest first
    async fn list(&self, filter: &TaskFilter) -> DomainResult<Vec<Task>>;

    /// Find a task by its ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// Insert a new task
    async fn create(&self, task: &Task) -> DomainResult<Uuid>;

    /// Write transition fields only if the stored status is still `expected`
    ///
    /// Returns `Ok(false)` without writing when another writer changed the
    /// status first, and `NotFound` when the task is gone.
    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        update: &StatusUpdate,
    ) -> DomainResult<bool>;
}
