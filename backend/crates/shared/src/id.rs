//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities. Identifiers are
//! database-assigned sequence values (BIGSERIAL), so they are only
//! constructed from an existing `i64`, never generated client-side.
//!
//! Usage:
//! ```
//! use kernel::id::{Id, markers};
//! type UserId = Id<markers::User>;
//! let id = UserId::from_i64(42);
//! assert_eq!(id.as_i64(), 42);
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Generic typed ID wrapper over a database sequence value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Wrap a database-assigned identifier.
    pub const fn from_i64(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying value.
    pub const fn as_i64(&self) -> i64 {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for user IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct User;

    /// Marker for refresh token IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct RefreshToken;

    /// Marker for email verification token IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct VerificationToken;

    /// Marker for two-factor secret IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct TwoFactorSecret;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type RefreshTokenId = Id<markers::RefreshToken>;
pub type VerificationTokenId = Id<markers::VerificationToken>;
pub type TwoFactorSecretId = Id<markers::TwoFactorSecret>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let user_id: UserId = Id::from_i64(1);
        let token_id: RefreshTokenId = Id::from_i64(1);

        // These are different types, cannot be mixed
        let _u: i64 = user_id.into();
        let _t: i64 = token_id.into();
    }

    #[test]
    fn test_id_roundtrip() {
        let id: UserId = Id::from_i64(123);
        assert_eq!(id.as_i64(), 123);
        assert_eq!(id.to_string(), "123");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: UserId = Id::from_i64(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
