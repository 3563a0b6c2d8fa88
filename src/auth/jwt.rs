// JWT token creation and verification
// Tokens carry the caller profile {id, role, state} and expire after 8 hours

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::caller::Caller;
use crate::domain::errors::DomainError;
use crate::domain::user::{Role, StateName};

const TOKEN_LIFETIME_HOURS: i64 = 8;

/// JWT claims structure
///
/// The claims are trusted as the caller's identity; nothing is looked up
/// per request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    pub role: Role,
    pub state: Option<String>,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

impl Claims {
    /// Rebuilds the caller the token was issued to
    pub fn caller(&self) -> Result<Caller, DomainError> {
        Caller::from_profile(self.sub, self.role, self.state.as_deref())
    }
}

/// Creates a signed token for `caller`
///
/// # Token Properties
/// - Expires after 8 hours
/// - Signed with HS256 algorithm
///
/// # Example
/// ```
/// use taskboard_api::auth::jwt::{create_token, verify_token};
/// use taskboard_api::domain::caller::Caller;
/// use uuid::Uuid;
///
/// let caller = Caller::SuperAdmin { id: Uuid::new_v4() };
/// let token = create_token(&caller, "your-secret-key").expect("valid token");
///
/// let claims = verify_token(&token, "your-secret-key").expect("valid token");
/// assert_eq!(claims.caller().unwrap(), caller);
/// ```
pub fn create_token(caller: &Caller, secret: &str) -> Result<String, String> {
    let expiry = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
    let claims = Claims {
        sub: caller.id(),
        role: caller.role(),
        state: caller.state().map(StateName::as_str).map(str::to_string),
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies signature and expiry, returning the decoded claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
