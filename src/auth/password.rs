// Password hashing for registration and login
// bcrypt at the library's default cost

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password with a fresh salt
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Checks a plaintext password against a stored hash
///
/// An unparsable hash is an error, a mismatch is `Ok(false)`.
///
/// # Example
/// ```
/// use taskboard_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("s3cret-pass").unwrap();
/// let valid = verify_password("s3cret-pass", &hash).unwrap();
/// assert!(valid);
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let password = "correct horse battery";
        let hash = hash_password(password).expect("valid hash");

        let valid = verify_password(password, &hash).expect("valid verification");
        assert!(valid);
    }

    #[test]
    fn verify_wrong_password() {
        let password = "correct horse battery";
        let hash = hash_password(password).expect("valid hash");

        let valid = verify_password("wrong_password", &hash).expect("valid verification");
        assert!(!valid);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
