//! Request / Response DTOs
//!
//! JSON shapes for the auth API. Field names are camelCase on the
//! wire.

use serde::{Deserialize, Serialize};

use crate::domain::entity::User;
use crate::domain::value_object::UserRole;
use crate::error::{AuthError, AuthResult, FieldError};

const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 100;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    /// Collect all field errors in one pass so the client can show
    /// them together.
    pub fn validate(&self) -> AuthResult<()> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len < NAME_MIN_LENGTH {
            errors.push(FieldError::new(
                "name",
                format!("Name must be at least {} characters", NAME_MIN_LENGTH),
            ));
        } else if name_len > NAME_MAX_LENGTH {
            errors.push(FieldError::new(
                "name",
                format!("Name must be at most {} characters", NAME_MAX_LENGTH),
            ));
        }

        if let Err(e) = crate::domain::value_object::Email::new(&self.email) {
            errors.push(FieldError::new("email", e.to_string()));
        }

        if let Err(e) = platform::password::ClearTextPassword::new(self.password.clone()) {
            errors.push(FieldError::new("password", e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(errors))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorVerifyRequest {
    pub user_id: i64,
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorEnableRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorDisableRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub totp_enabled: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.as_i64(),
            email: user.email.as_str().to_string(),
            name: user.display_name.clone(),
            role: user.role,
            email_verified: user.email_verified,
            totp_enabled: user.totp_enabled,
        }
    }
}

/// Successful authentication: the access token travels in the body,
/// the refresh token only ever in the cookie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSuccessResponse {
    pub user: UserResponse,
    pub access_token: String,
}

/// Login accepted but a TOTP code is still required
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorChallengeResponse {
    #[serde(rename = "requires2FA")]
    pub requires_2fa: bool,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorSetupResponse {
    pub secret: String,
    pub otpauth_url: String,
    /// QR code as base64-encoded PNG
    pub qr_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_validation_collects_all_errors() {
        let req = SignUpRequest {
            name: "x".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        match req.validate() {
            Err(AuthError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_sign_up_validation_accepts_valid_input() {
        let req = SignUpRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_user_response_serializes_camel_case() {
        let json = serde_json::to_value(UserResponse {
            id: 7,
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            role: UserRole::Organizer,
            email_verified: true,
            totp_enabled: false,
        })
        .unwrap();

        assert_eq!(json["emailVerified"], true);
        assert_eq!(json["totpEnabled"], false);
        assert_eq!(json["role"], "organizer");
    }

    #[test]
    fn test_challenge_response_shape() {
        let json = serde_json::to_value(TwoFactorChallengeResponse {
            requires_2fa: true,
            user_id: 3,
        })
        .unwrap();

        assert_eq!(json["requires2FA"], true);
        assert_eq!(json["userId"], 3);
        assert!(json.get("requires2fa").is_none());
    }
}
