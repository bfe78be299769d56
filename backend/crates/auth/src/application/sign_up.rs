//! Sign Up Use Case
//!
//! Registers a new account and mails a verification link. Signup never
//! authenticates: the new account cannot log in until the email is
//! verified.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::{NewUser, NewVerificationToken};
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::domain::value_object::{Email, PasswordHash};
use crate::error::{AuthError, AuthResult};
use crate::infra::mailer::Mailer;

/// Verification tokens are 32 random bytes, hex-encoded.
const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, V, M>
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

impl<U, V, M> SignUpUseCase<U, V, M>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<()> {
        let email = Email::new(&input.email)
            .map_err(|e| AuthError::Validation(vec![crate::error::FieldError::new(
                "email",
                e.to_string(),
            )]))?;

        // Friendly pre-check; the unique constraint is the real guard
        // against concurrent signups with the same address.
        if self.user_repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password).map_err(|e| {
            AuthError::Validation(vec![crate::error::FieldError::new("password", e.to_string())])
        })?;
        let password_hash = PasswordHash::from_raw(&password)?;

        let user_id = self
            .user_repo
            .create_user(&NewUser::new(email.clone(), input.display_name, password_hash))
            .await?;

        let token = crypto::generate_token(VERIFICATION_TOKEN_BYTES);
        self.verification_repo
            .insert_verification_token(&NewVerificationToken {
                user_id,
                token: token.clone(),
                expires_at: Utc::now() + self.config.verification_token_ttl(),
            })
            .await?;

        self.mailer
            .send_verification(&email, &self.config.verification_link(&token))
            .await?;

        tracing::info!(user_id = %user_id, "User signed up, verification email queued");

        Ok(())
    }
}
