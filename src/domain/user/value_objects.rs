use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::DomainError;

/// Email value object representing a plausible email address
///
/// # Invariants
/// - Contains an '@' with something on both sides
/// - Surrounding whitespace is trimmed
/// - Immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use taskboard_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("head@lagos.example").expect("valid email");
    /// assert_eq!(email.as_str(), "head@lagos.example");
    /// assert!(Email::new("no-at-sign").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let email = email.into().trim().to_string();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(DomainError::InvalidInput(format!("Invalid email: {}", email)))
        }
    }

    fn is_valid(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        }
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of the region ("state") a team is organised under
///
/// Not to be confused with a lifecycle status. Compared exactly, after
/// trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput(
                "State name cannot be empty".to_string(),
            ));
        }
        Ok(StateName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateName::new(value)
    }
}

impl From<StateName> for String {
    fn from(state: StateName) -> Self {
        state.0
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_with_subdomain() {
        assert!(Email::new("user@mail.example.com").is_ok());
    }

    #[test]
    fn email_is_trimmed() {
        let email = Email::new("  member@example.com ").unwrap();
        assert_eq!(email.as_str(), "member@example.com");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_missing_domain() {
        assert!(Email::new("a@").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert!(matches!(
            Email::new(""),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn email_deserialization_validates() {
        let ok: Result<Email, _> = serde_json::from_str("\"x@y.z\"");
        assert!(ok.is_ok());
        let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn state_name_rejects_blank() {
        assert!(StateName::new("   ").is_err());
        assert_eq!(StateName::new(" Lagos ").unwrap().as_str(), "Lagos");
    }

    #[test]
    fn state_names_compare_exactly() {
        assert_ne!(StateName::new("Lagos").unwrap(), StateName::new("lagos").unwrap());
    }
}
