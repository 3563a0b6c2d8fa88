//! Registration, login and the settings page.

use crate::auth::password::{hash_password, verify_password};
use crate::domain::caller::Caller;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Repositories;
use crate::domain::user::{Email, ProfileUpdate, Role, StateName, User};

/// Data collected by the sign-up form
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub state: Option<String>,
}

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct AccountService {
    repos: Repositories,
}

impl AccountService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Creates a user with a bcrypt-hashed password
    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        if registration.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let email = Email::new(registration.email)?;
        let state = registration
            .state
            .filter(|s| !s.trim().is_empty())
            .map(StateName::new)
            .transpose()?;
        let user = User::register(email, registration.name, registration.role, state)?;

        let password_hash = hash_password(&registration.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            DomainError::StoreUnavailable("Failed to hash password".to_string())
        })?;

        self.repos.users.create(&user, &password_hash).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Returns the user when the password matches, `None` otherwise
    ///
    /// Unknown emails and wrong passwords are indistinguishable.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<Option<User>> {
        let Ok(email) = Email::new(email) else {
            return Ok(None);
        };
        let Some((user, hash)) = self.repos.users.find_credentials_by_email(&email).await? else {
            return Ok(None);
        };

        match verify_password(password, &hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                Ok(None)
            }
        }
    }

    pub async fn profile(&self, caller: &Caller) -> DomainResult<User> {
        self.repos
            .users
            .find_by_id(caller.id())
            .await?
            .ok_or_else(|| DomainError::user_not_found(caller.id()))
    }

    /// Settings page: name, email and bank details of the caller
    pub async fn update_profile(
        &self,
        caller: &Caller,
        update: ProfileUpdate,
    ) -> DomainResult<User> {
        let user = self.repos.users.update_profile(caller.id(), &update).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::BankInfo;
    use crate::infrastructure::repositories::{in_memory_repositories, InMemoryStore};

    fn service() -> AccountService {
        AccountService::new(in_memory_repositories(InMemoryStore::new()))
    }

    fn registration(email: &str, role: Role, state: Option<&str>) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret-pass".to_string(),
            name: "Ngozi".to_string(),
            role,
            state: state.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let accounts = service();
        let user = accounts
            .register(registration("n@example.com", Role::TeamMember, Some("Lagos")))
            .await
            .unwrap();

        let found = accounts
            .authenticate("n@example.com", "secret-pass")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let wrong = accounts.authenticate("n@example.com", "nope").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn member_without_state_is_rejected() {
        let err = service()
            .register(registration("n@example.com", Role::TeamMember, Some("  ")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let mut reg = registration("n@example.com", Role::SuperAdmin, None);
        reg.password = "abc".to_string();
        assert!(service().register(reg).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let accounts = service();
        accounts
            .register(registration("n@example.com", Role::SuperAdmin, None))
            .await
            .unwrap();
        let err = accounts
            .register(registration("n@example.com", Role::SuperAdmin, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn settings_update_bank_info() {
        let accounts = service();
        let user = accounts
            .register(registration("n@example.com", Role::TeamMember, Some("Kano")))
            .await
            .unwrap();
        let caller = Caller::from_user(&user).unwrap();
        let bank = BankInfo {
            account_name: "Ngozi A".to_string(),
            account_number: "0123456789".to_string(),
            bank_name: "First Bank".to_string(),
        };

        let update = ProfileUpdate::new(
            "Ngozi A".to_string(),
            Email::new("ngozi@example.com").unwrap(),
            Some(bank.clone()),
        )
        .unwrap();
        let updated = accounts.update_profile(&caller, update).await.unwrap();

        assert_eq!(updated.name, "Ngozi A");
        assert_eq!(updated.bank_info, Some(bank));
        assert_eq!(accounts.profile(&caller).await.unwrap(), updated);
    }
}
