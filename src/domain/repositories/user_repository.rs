use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::user::{Email, ProfileUpdate, User};
use crate::domain::visibility::UserFilter;

/// Repository trait for users
///
/// Password hashes travel next to the user, never inside it.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; a taken email fails with `InvalidInput`
    async fn create(&self, user: &User, password_hash: &str) -> DomainResult<Uuid>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Find a user and their password hash by email address
    async fn find_credentials_by_email(&self, email: &Email)
        -> DomainResult<Option<(User, String)>>;

    /// List users matching the filter, ordered by name
    async fn list(&self, filter: &UserFilter) -> DomainResult<Vec<User>>;

    /// Overwrite name, email and bank info; returns the stored user
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> DomainResult<User>;
}
