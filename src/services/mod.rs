//! Application services
//!
//! Orchestrate the domain aggregates and store ports on behalf of an
//! explicit [`Caller`](crate::domain::Caller).

pub mod accounts;
pub mod lifecycle;
pub mod queries;

pub use accounts::{AccountService, Registration};
pub use lifecycle::{SubmitProof, TaskLifecycleService};
pub use queries::{Dashboard, PaymentOverview, TaskDetail, TaskQueryService};
