//! Email Verification Use Case
//!
//! Redeems verification tokens and handles resend requests. The three
//! failure modes (unknown, already used, expired) are reported
//! distinctly so the client can offer a resend where it helps.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto;

use crate::application::config::AuthConfig;
use crate::domain::entity::NewVerificationToken;
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use crate::infra::mailer::Mailer;

const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Email verification use case
pub struct VerifyEmailUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationTokenRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    verification_repo: Arc<V>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, V, M> VerifyEmailUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationTokenRepository,
    M: Mailer,
{
    pub fn new(
        user_repo: Arc<U>,
        verification_repo: Arc<V>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            verification_repo,
            mailer,
            config,
        }
    }

    /// Redeem a verification token.
    pub async fn execute(&self, raw_token: &str) -> AuthResult<()> {
        let token = self
            .verification_repo
            .find_verification_token(raw_token)
            .await?
            .ok_or(AuthError::VerificationTokenNotFound)?;

        if token.is_used {
            return Err(AuthError::VerificationTokenUsed);
        }
        if token.is_expired(Utc::now()) {
            return Err(AuthError::VerificationTokenExpired);
        }

        // Guarded update; a concurrent redeemer that lost the race
        // sees the token as used.
        if !self
            .verification_repo
            .mark_verification_token_used(token.id)
            .await?
        {
            return Err(AuthError::VerificationTokenUsed);
        }

        self.user_repo.set_email_verified(token.user_id).await?;
        tracing::info!(user_id = %token.user_id, "Email verified");

        Ok(())
    }

    /// Issue and mail a fresh verification token. Older tokens stay
    /// valid until they expire or are used.
    pub async fn resend(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email).map_err(|_| AuthError::UserNotFound)?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let token = crypto::generate_token(VERIFICATION_TOKEN_BYTES);
        self.verification_repo
            .insert_verification_token(&NewVerificationToken {
                user_id: user.user_id,
                token: token.clone(),
                expires_at: Utc::now() + self.config.verification_token_ttl(),
            })
            .await?;

        self.mailer
            .send_verification(&user.email, &self.config.verification_link(&token))
            .await?;

        tracing::info!(user_id = %user.user_id, "Verification email resent");

        Ok(())
    }
}
