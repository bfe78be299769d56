//! Refresh Use Case
//!
//! Rotates a refresh token: the presented token is atomically
//! consumed and a brand new access + refresh pair is issued. A token
//! can therefore be redeemed at most once; replays fail.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto;

use crate::application::session::{IssuedSession, SessionIssuer};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    sessions: SessionIssuer<R>,
}

impl<U, R> RefreshUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, refresh_repo: Arc<R>, sessions: SessionIssuer<R>) -> Self {
        Self {
            user_repo,
            refresh_repo,
            sessions,
        }
    }

    pub async fn execute(&self, raw_token: &str) -> AuthResult<IssuedSession> {
        let digest = crypto::token_digest(raw_token);

        let user_id = self
            .refresh_repo
            .consume_refresh_token(&digest, Utc::now())
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        // The account may have been deleted since the token was
        // issued; its consumed token stays consumed.
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let session = self.sessions.issue(user).await?;
        tracing::debug!(user_id = %session.user.user_id, "Refresh token rotated");

        Ok(session)
    }
}
