//! Email Verification Token Entity
//!
//! Single-use token mailed to the user to prove email ownership.

use chrono::{DateTime, Utc};
use kernel::id::{UserId, VerificationTokenId};

/// Email verification token
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub id: VerificationTokenId,
    pub user_id: UserId,
    /// Raw token value as mailed out. Verification tokens are single
    /// use and short lived, so they are stored as-is.
    pub token: String,
    /// Set once the token has been redeemed
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Parameters for issuing a verification token
#[derive(Debug, Clone)]
pub struct NewVerificationToken {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = VerificationToken {
            id: VerificationTokenId::from_i64(1),
            user_id: UserId::from_i64(1),
            token: "abc".into(),
            is_used: false,
            expires_at: now,
            created_at: now - Duration::hours(24),
        };

        // Exactly at expiry counts as expired.
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - Duration::seconds(1)));
        assert!(token.is_expired(now + Duration::seconds(1)));
    }
}
