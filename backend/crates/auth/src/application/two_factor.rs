//! Two-Factor Setup Use Case
//!
//! TOTP enrollment lifecycle: generate a secret, confirm it with a
//! valid code, and disable it again (also code-gated). Login-time
//! verification lives in the sign-in flow.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::repository::{TwoFactorRepository, UserRepository};
use crate::domain::value_object::TotpSecret;
use crate::error::{AuthError, AuthResult};

/// Provisioning material returned from setup
pub struct TwoFactorSetup {
    /// Base32 secret for manual entry
    pub secret: String,
    /// otpauth:// URL
    pub otpauth_url: String,
    /// QR code as base64-encoded PNG
    pub qr_code_base64: String,
}

/// Two-factor setup use case
pub struct TwoFactorSetupUseCase<U, T>
where
    U: UserRepository,
    T: TwoFactorRepository,
{
    user_repo: Arc<U>,
    two_factor_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<U, T> TwoFactorSetupUseCase<U, T>
where
    U: UserRepository,
    T: TwoFactorRepository,
{
    pub fn new(user_repo: Arc<U>, two_factor_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            two_factor_repo,
            config,
        }
    }

    /// Begin enrollment: generate and store a secret, returning the
    /// provisioning material. Replaces any unconfirmed secret; an
    /// active enrollment must be disabled first.
    pub async fn setup(&self, user_id: UserId) -> AuthResult<TwoFactorSetup> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(existing) = self
            .two_factor_repo
            .find_two_factor_by_user_id(user_id)
            .await?
        {
            if existing.is_enabled {
                return Err(AuthError::TwoFactorAlreadyEnabled);
            }
        }

        let secret = TotpSecret::generate();
        self.two_factor_repo
            .upsert_two_factor_secret(user_id, &secret)
            .await?;

        let issuer = &self.config.totp_issuer;
        let account = user.email.as_str();

        Ok(TwoFactorSetup {
            otpauth_url: secret
                .get_otpauth_url(issuer, account)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            qr_code_base64: secret
                .generate_qr_code(issuer, account)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            secret: secret.as_base32().to_string(),
        })
    }

    /// Confirm enrollment with a code from the authenticator. Only
    /// after this does 2FA gate the user's logins.
    pub async fn confirm(&self, user_id: UserId, code: &str) -> AuthResult<()> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let enrollment = self
            .two_factor_repo
            .find_two_factor_by_user_id(user_id)
            .await?
            .ok_or(AuthError::TwoFactorNotSetup)?;

        if enrollment.is_enabled {
            return Err(AuthError::TwoFactorAlreadyEnabled);
        }

        let valid = enrollment
            .secret
            .verify(code, &self.config.totp_issuer, user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidTwoFactorCode);
        }

        self.two_factor_repo
            .set_two_factor_enabled(user_id, true)
            .await?;
        self.user_repo.set_totp_enabled(user_id, true).await?;

        tracing::info!(user_id = %user_id, "Two-factor authentication enabled");

        Ok(())
    }

    /// Disable 2FA. Requires a currently valid code so a stolen access
    /// token alone cannot strip the second factor.
    pub async fn disable(&self, user_id: UserId, code: &str) -> AuthResult<()> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let enrollment = self
            .two_factor_repo
            .find_two_factor_by_user_id(user_id)
            .await?
            .filter(|e| e.is_enabled)
            .ok_or(AuthError::TwoFactorNotSetup)?;

        let valid = enrollment
            .secret
            .verify(code, &self.config.totp_issuer, user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidTwoFactorCode);
        }

        self.two_factor_repo.delete_two_factor(user_id).await?;
        self.user_repo.set_totp_enabled(user_id, false).await?;

        tracing::info!(user_id = %user_id, "Two-factor authentication disabled");

        Ok(())
    }
}
