//! Session Issuing
//!
//! Shared helper that mints the access + refresh token pair handed out
//! by login, two-factor completion, and refresh. The raw refresh token
//! crosses this boundary exactly once; only its digest is persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::crypto;

use crate::application::access_token::AccessTokenIssuer;
use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Refresh tokens are 64 random bytes, hex-encoded.
const REFRESH_TOKEN_BYTES: usize = 64;

/// A freshly established session
pub struct IssuedSession {
    pub user: User,
    pub access_token: String,
    /// Raw refresh token, for the cookie. Never stored.
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Mints token pairs against the refresh token store
pub struct SessionIssuer<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
    tokens: Arc<AccessTokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> SessionIssuer<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>, tokens: Arc<AccessTokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            refresh_repo,
            tokens,
            config,
        }
    }

    /// Issue a new access + refresh token pair for the user.
    pub async fn issue(&self, user: User) -> AuthResult<IssuedSession> {
        let access_token = self.tokens.issue(user.user_id, &user.email, user.role)?;

        let refresh_token = crypto::generate_token(REFRESH_TOKEN_BYTES);
        let expires_at = Utc::now() + self.config.refresh_token_ttl();

        self.refresh_repo
            .insert_refresh_token(user.user_id, &crypto::token_digest(&refresh_token), expires_at)
            .await?;

        Ok(IssuedSession {
            user,
            access_token,
            refresh_token,
            refresh_expires_at: expires_at,
        })
    }
}
