//! Password Hash Value Object
//!
//! Stored Argon2id hash in PHC string format. The raw password only
//! ever exists as a `ClearTextPassword`, which is zeroized on drop.

use crate::error::{AuthError, AuthResult};
use platform::password::{self, ClearTextPassword};
use serde::{Deserialize, Serialize};

/// A stored password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a clear text password
    pub fn from_raw(raw: &ClearTextPassword) -> AuthResult<Self> {
        let hash = password::hash_password(raw)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;
        Ok(Self(hash))
    }

    /// Create from database value (assumed already a valid PHC string)
    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Verify a candidate password against this hash.
    ///
    /// A malformed stored hash verifies as false rather than erroring;
    /// the caller cannot distinguish it from a wrong password, which is
    /// the correct behavior for a login path.
    pub fn verify(&self, candidate: &ClearTextPassword) -> bool {
        password::verify_password(candidate, &self.0).unwrap_or(false)
    }

    /// Get the PHC string for storage
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for database storage
    pub fn into_db(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let raw = ClearTextPassword::new("correct horse battery").unwrap();
        let hash = PasswordHash::from_raw(&raw).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.verify(&raw));

        let wrong = ClearTextPassword::new("incorrect horse").unwrap();
        assert!(!hash.verify(&wrong));
    }

    #[test]
    fn test_malformed_stored_hash_verifies_false() {
        let raw = ClearTextPassword::new("correct horse battery").unwrap();
        let hash = PasswordHash::from_db("corrupted");
        assert!(!hash.verify(&raw));
    }
}
