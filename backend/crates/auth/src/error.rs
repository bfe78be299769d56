//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with this email already exists
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Wrong email or password. Deliberately indistinguishable between
    /// the two so credentials cannot be probed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Credentials are correct but the email has not been verified yet
    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    /// Access token failed signature, structure, or expiry checks
    #[error("Invalid or expired access token")]
    InvalidAccessToken,

    /// Refresh token unknown, already consumed, or expired
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// Submitted TOTP code does not match the current time window
    #[error("Invalid two-factor authentication code")]
    InvalidTwoFactorCode,

    /// Operation requires an enabled TOTP enrollment
    #[error("Two-factor authentication is not set up")]
    TwoFactorNotSetup,

    /// Re-enrollment attempted while 2FA is active
    #[error("Two-factor authentication is already enabled")]
    TwoFactorAlreadyEnabled,

    /// Unknown verification token
    #[error("Invalid verification token")]
    VerificationTokenNotFound,

    /// Verification token was already redeemed
    #[error("Verification token has already been used")]
    VerificationTokenUsed,

    /// Verification token past its expiry
    #[error("Verification token has expired")]
    VerificationTokenExpired,

    /// Resend requested for an already-verified email
    #[error("Email is already verified")]
    AlreadyVerified,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Role-gated operation attempted by an insufficient role
    #[error("Access denied. Required role: {0}")]
    Forbidden(String),

    /// Admin operation aimed at the requester's own account
    #[error("Admins cannot modify their own account")]
    SelfActionForbidden,

    /// Request failed field-level validation
    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Outbound email delivery failed
    #[error("Email delivery failed: {0}")]
    Mail(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken | AuthError::TwoFactorAlreadyEnabled => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::EmailNotVerified
            | AuthError::InvalidAccessToken
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidTwoFactorCode => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) | AuthError::SelfActionForbidden => StatusCode::FORBIDDEN,
            AuthError::VerificationTokenNotFound | AuthError::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            AuthError::TwoFactorNotSetup
            | AuthError::VerificationTokenUsed
            | AuthError::VerificationTokenExpired
            | AuthError::AlreadyVerified => StatusCode::BAD_REQUEST,
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Database(_) | AuthError::Mail(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::TwoFactorAlreadyEnabled => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::EmailNotVerified
            | AuthError::InvalidAccessToken
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidTwoFactorCode => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) | AuthError::SelfActionForbidden => ErrorKind::Forbidden,
            AuthError::VerificationTokenNotFound | AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::TwoFactorNotSetup
            | AuthError::VerificationTokenUsed
            | AuthError::VerificationTokenExpired
            | AuthError::AlreadyVerified => ErrorKind::BadRequest,
            AuthError::Validation(_) => ErrorKind::UnprocessableEntity,
            AuthError::Database(_) | AuthError::Mail(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError. Server-side failures are surfaced opaque;
    /// the detail stays in the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Mail(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "An unexpected error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Mail(msg) => {
                tracing::error!(message = %msg, "Auth mail delivery error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Refresh attempt with invalid or consumed token");
            }
            AuthError::InvalidTwoFactorCode => {
                tracing::warn!("Invalid two-factor code submitted");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        // Validation carries per-field details the generic problem
        // body cannot express.
        if let AuthError::Validation(details) = &self {
            let body = serde_json::json!({
                "type": "https://httpstatuses.io/422",
                "title": "Unprocessable Entity",
                "status": 422,
                "detail": self.to_string(),
                "errors": details,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
        }

        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::EmailNotVerified.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::VerificationTokenNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::VerificationTokenUsed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::VerificationTokenExpired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AuthError::Forbidden("admin".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::SelfActionForbidden.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let err = AuthError::Internal("signing key missing".into());
        let app = err.to_app_error();
        assert!(!app.message().contains("signing key"));
    }

    #[test]
    fn test_unverified_and_wrong_password_share_kind() {
        // Both are pre-session failures and must carry the same kind.
        assert_eq!(
            AuthError::InvalidCredentials.kind(),
            AuthError::EmailNotVerified.kind()
        );
    }
}
