use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::store_error;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{BankInfo, Email, ProfileUpdate, Role, StateName, User};
use crate::domain::visibility::UserFilter;

const USER_COLUMNS: &str = "id, email, name, role, state, \
     bank_account_name, bank_account_number, bank_name, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: Role,
    state: Option<String>,
    bank_account_name: Option<String>,
    bank_account_number: Option<String>,
    bank_name: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email)
            .map_err(|e| DomainError::StoreUnavailable(format!("Invalid email from database: {}", e)))?;
        let state = row
            .state
            .map(StateName::new)
            .transpose()
            .map_err(|e| DomainError::StoreUnavailable(format!("Invalid state from database: {}", e)))?;
        let bank_info = match (row.bank_account_name, row.bank_account_number, row.bank_name) {
            (None, None, None) => None,
            (account_name, account_number, bank_name) => Some(BankInfo {
                account_name: account_name.unwrap_or_default(),
                account_number: account_number.unwrap_or_default(),
                bank_name: bank_name.unwrap_or_default(),
            }),
        };

        Ok(User {
            id: row.id,
            email,
            name: row.name,
            role: row.role,
            state,
            bank_info,
            created_at: row.created_at,
        })
    }
}

fn map_write_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DomainError::InvalidInput("Email already registered".to_string())
        }
        other => store_error(context)(other),
    }
}

/// Builds `(state AND role AND id) OR id = also_include`, ordered by name
fn user_list_query(filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {} FROM users WHERE (TRUE", USER_COLUMNS));
    if let Some(state) = &filter.state {
        query.push(" AND state = ").push_bind(state.as_str().to_string());
    }
    if let Some(role) = filter.role {
        query.push(" AND role = ").push_bind(role);
    }
    if let Some(id) = filter.id {
        query.push(" AND id = ").push_bind(id);
    }
    query.push(")");
    if let Some(extra) = filter.also_include {
        query.push(" OR id = ").push_bind(extra);
    }
    query.push(" ORDER BY name, id");
    query
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> DomainResult<Uuid> {
        let bank = user.bank_info.as_ref();
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, name, role, state,
                bank_account_name, bank_account_number, bank_name,
                password_hash, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.role)
        .bind(user.state.as_ref().map(StateName::as_str))
        .bind(bank.map(|b| b.account_name.as_str()))
        .bind(bank.map(|b| b.account_number.as_str()))
        .bind(bank.map(|b| b.bank_name.as_str()))
        .bind(password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error("Failed to create user"))?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error("Failed to find user by id"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> DomainResult<Option<(User, String)>> {
        let row: Option<CredentialsRow> = sqlx::query_as(&format!(
            "SELECT {}, password_hash FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find user by email"))?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &UserFilter) -> DomainResult<Vec<User>> {
        let mut query = user_list_query(filter);
        let rows: Vec<UserRow> = query
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("Failed to list users"))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> DomainResult<User> {
        let bank = update.bank_info.as_ref().filter(|b| !b.is_blank());
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3,
                bank_account_name = $4, bank_account_number = $5, bank_name = $6
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&update.name)
        .bind(update.email.as_str())
        .bind(bank.map(|b| b.account_name.as_str()))
        .bind(bank.map(|b| b.account_number.as_str()))
        .bind(bank.map(|b| b.bank_name.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to update profile"))?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::user_not_found(id))
    }
}
