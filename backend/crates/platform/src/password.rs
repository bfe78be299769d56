//! Password Hashing and Verification
//!
//! NIST SP 800-63B compliant password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Unicode NFKC normalization before hashing

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Ensures that password data is securely erased from memory when the
/// value is dropped. Does not implement `Clone`; debug output is
/// redacted. Unicode is normalized using NFKC before validation so
/// that visually identical inputs hash identically.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with policy validation.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw.into();
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        if normalized.chars().any(char::is_control) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        let len = normalized.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: len,
            });
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: len,
            });
        }

        Ok(Self(normalized))
    }

    /// Access the normalized password bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword(***)")
    }
}

// ============================================================================
// Hashing / Verification
// ============================================================================

/// Hash a password with Argon2id and a fresh random salt.
///
/// Output is the PHC string format, storable as-is.
pub fn hash_password(password: &ClearTextPassword) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
pub fn verify_password(
    password: &ClearTextPassword,
    stored_hash: &str,
) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_min_length() {
        assert!(matches!(
            ClearTextPassword::new("short"),
            Err(PasswordPolicyError::TooShort { .. })
        ));
        assert!(ClearTextPassword::new("exactly8c").is_ok());
    }

    #[test]
    fn test_policy_max_length() {
        let long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(
            ClearTextPassword::new(long),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_policy_whitespace_and_control() {
        assert!(matches!(
            ClearTextPassword::new("        "),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
        assert!(matches!(
            ClearTextPassword::new("pass\0word123"),
            Err(PasswordPolicyError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("correct horse battery").unwrap();
        let hash = hash_password(&password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&password, &hash).unwrap());

        let wrong = ClearTextPassword::new("incorrect horse").unwrap();
        assert!(!verify_password(&wrong, &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = ClearTextPassword::new("correct horse battery").unwrap();
        let h1 = hash_password(&password).unwrap();
        let h2 = hash_password(&password).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let password = ClearTextPassword::new("correct horse battery").unwrap();
        assert!(matches!(
            verify_password(&password, "not-a-phc-string"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_nfkc_normalization() {
        // U+FF41 FULLWIDTH LATIN SMALL LETTER A normalizes to 'a'
        let wide = ClearTextPassword::new("\u{ff41}bcdefgh").unwrap();
        let plain = ClearTextPassword::new("abcdefgh").unwrap();
        let hash = hash_password(&plain).unwrap();
        assert!(verify_password(&wide, &hash).unwrap());
    }

    #[test]
    fn test_debug_redacted() {
        let password = ClearTextPassword::new("correct horse battery").unwrap();
        assert_eq!(format!("{:?}", password), "ClearTextPassword(***)");
    }
}
