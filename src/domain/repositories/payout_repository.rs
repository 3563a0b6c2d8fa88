use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Read access to payout records kept by the payments side
#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Sum already paid to a user; `None` when there are no records
    async fn total_paid_to(&self, user_id: Uuid) -> DomainResult<Option<Decimal>>;
}
