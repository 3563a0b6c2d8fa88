// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod caller;
pub mod errors;
pub mod payment;
pub mod repositories;
pub mod stats;
pub mod task;
pub mod user;
pub mod visibility;

pub use caller::Caller;
pub use errors::{DomainError, DomainResult};
