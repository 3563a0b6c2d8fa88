// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::errors::DomainError;
use crate::domain::repositories::Repositories;

pub mod in_memory;
pub mod postgres_payout_repository;
pub mod postgres_submission_repository;
pub mod postgres_task_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_payout_repository::PostgresPayoutRepository;
pub use postgres_submission_repository::PostgresSubmissionRepository;
pub use postgres_task_repository::PostgresTaskRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Logs a driver error and surfaces it as `StoreUnavailable`
pub(crate) fn store_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        DomainError::StoreUnavailable(format!("{}: {}", context, e))
    }
}

/// Wires every port to the Postgres adapters sharing one pool
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        submissions: Arc::new(PostgresSubmissionRepository::new(pool.clone())),
        payouts: Arc::new(PostgresPayoutRepository::new(pool)),
    }
}

/// Wires every port to one shared in-memory store
pub fn in_memory_repositories(store: InMemoryStore) -> Repositories {
    Repositories {
        tasks: Arc::new(store.clone()),
        users: Arc::new(store.clone()),
        submissions: Arc::new(store.clone()),
        payouts: Arc::new(store),
    }
}
