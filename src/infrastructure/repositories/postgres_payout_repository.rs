use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::domain::errors::DomainResult;
use crate::domain::repositories::PayoutRepository;

/// PostgreSQL implementation of PayoutRepository
///
/// Reads the `payouts` table; rows are written by the payments side.
pub struct PostgresPayoutRepository {
    pool: PgPool,
}

impl PostgresPayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for PostgresPayoutRepository {
    async fn total_paid_to(&self, user_id: Uuid) -> DomainResult<Option<Decimal>> {
        // SUM over zero rows is NULL, which maps to None
        sqlx::query_scalar::<_, Option<Decimal>>("SELECT SUM(amount) FROM payouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error("Failed to sum payouts"))
    }
}
