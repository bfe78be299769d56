//! Sign In Use Case
//!
//! Authenticates a user and, when the account has no active two-factor
//! enrollment, establishes a session. Accounts with 2FA enabled get a
//! challenge instead; `complete_two_factor` finishes the login.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::repository::{RefreshTokenRepository, TwoFactorRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Outcome of a password login
pub enum SignInOutput {
    /// Password accepted but a TOTP code is still required. No tokens
    /// are issued at this point.
    TwoFactorRequired { user_id: UserId },
    /// Fully authenticated
    Authenticated(IssuedSession),
}

/// Sign in use case
pub struct SignInUseCase<U, R, T>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    T: TwoFactorRepository,
{
    user_repo: Arc<U>,
    two_factor_repo: Arc<T>,
    sessions: SessionIssuer<R>,
    config: Arc<AuthConfig>,
}

impl<U, R, T> SignInUseCase<U, R, T>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    T: TwoFactorRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        two_factor_repo: Arc<T>,
        sessions: SessionIssuer<R>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            two_factor_repo,
            sessions,
            config,
        }
    }

    pub async fn execute(&self, email: &str, password: &str) -> AuthResult<SignInOutput> {
        // Malformed email cannot match any account; collapse to the
        // same error as a wrong password.
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let candidate =
            ClearTextPassword::new(password).map_err(|_| AuthError::InvalidCredentials)?;
        if !user.password_hash.verify(&candidate) {
            return Err(AuthError::InvalidCredentials);
        }

        // Verification is checked only after the password, so an
        // unverified response never confirms a password guess.
        if !user.can_login() {
            return Err(AuthError::EmailNotVerified);
        }

        if user.requires_2fa() {
            return Ok(SignInOutput::TwoFactorRequired {
                user_id: user.user_id,
            });
        }

        let session = self.sessions.issue(user).await?;
        tracing::info!(user_id = %session.user.user_id, "User signed in");

        Ok(SignInOutput::Authenticated(session))
    }

    /// Second step of a 2FA login: verify the TOTP code and establish
    /// the session.
    pub async fn complete_two_factor(
        &self,
        user_id: UserId,
        code: &str,
    ) -> AuthResult<IssuedSession> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AuthError::EmailNotVerified);
        }

        let enrollment = self
            .two_factor_repo
            .find_two_factor_by_user_id(user.user_id)
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

        let session = self.sessions.issue(user).await?;
        tracing::info!(user_id = %session.user.user_id, "User completed two-factor sign in");

        Ok(session)
    }
}
