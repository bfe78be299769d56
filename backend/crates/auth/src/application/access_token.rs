//! Access Token Issuing and Verification
//!
//! Short-lived JWT access tokens signed with HS256. The claims carry
//! everything the authorization layer needs, so protected requests
//! never touch the database.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{Email, UserRole};
use crate::error::{AuthError, AuthResult};

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id, as a string per JWT convention
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn user_id(&self) -> AuthResult<UserId> {
        self.sub
            .parse::<i64>()
            .map(UserId::from_i64)
            .map_err(|_| AuthError::InvalidAccessToken)
    }

    pub fn user_role(&self) -> UserRole {
        self.role
    }
}

/// Issues and verifies access tokens with a shared HMAC secret
pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl AccessTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a signed access token for the user
    pub fn issue(&self, user_id: UserId, email: &Email, role: UserRole) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id.as_i64().to_string(),
            email: email.as_str().to_string(),
            role,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {}", e)))
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Every failure mode collapses to `InvalidAccessToken`; callers
    /// must not learn whether the signature or the expiry failed.
    pub fn verify(&self, token: &str) -> AuthResult<AccessClaims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidAccessToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &[u8]) -> AccessTokenIssuer {
        AccessTokenIssuer::new(secret, Duration::from_secs(900))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer(b"test-secret");
        let email = Email::new("user@example.com").unwrap();

        let token = issuer
            .issue(UserId::from_i64(42), &email, UserRole::Organizer)
            .unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), UserId::from_i64(42));
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, UserRole::Organizer);
        assert!(claims.exp - claims.iat == 900);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let email = Email::new("user@example.com").unwrap();
        let token = issuer(b"secret-a")
            .issue(UserId::from_i64(1), &email, UserRole::Attendee)
            .unwrap();

        assert!(matches!(
            issuer(b"secret-b").verify(&token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let email = Email::new("user@example.com").unwrap();
        // Already expired; jsonwebtoken's default leeway is 60s so go
        // well past it.
        let issuer = AccessTokenIssuer::new(b"test-secret", Duration::from_secs(0));
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: "1".to_string(),
            email: email.as_str().to_string(),
            role: UserRole::Attendee,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            issuer(b"test-secret").verify("not.a.jwt"),
            Err(AuthError::InvalidAccessToken)
        ));
    }
}
