//! Sign Out Use Case
//!
//! Revokes the presented refresh token. Idempotent: signing out with
//! a missing, unknown, or already-revoked token still succeeds.

use std::sync::Arc;

use platform::crypto;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
}

impl<R> SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>) -> Self {
        Self { refresh_repo }
    }

    pub async fn execute(&self, raw_token: Option<&str>) -> AuthResult<()> {
        if let Some(raw) = raw_token {
            self.refresh_repo
                .delete_refresh_token(&crypto::token_digest(raw))
                .await?;
        }
        Ok(())
    }
}
