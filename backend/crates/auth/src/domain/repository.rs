//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{NewUser, NewVerificationToken, TwoFactorEnrollment, User, VerificationToken};
use crate::domain::value_object::{Email, TotpSecret, UserRole};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user, returning the assigned id.
    ///
    /// A unique-email violation surfaces as `AuthError::EmailTaken`.
    async fn create_user(&self, user: &NewUser) -> AuthResult<UserId>;

    /// Find user by email
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Mark the user's email as verified
    async fn set_email_verified(&self, user_id: UserId) -> AuthResult<()>;

    /// Flip the user's two-factor flag
    async fn set_totp_enabled(&self, user_id: UserId, enabled: bool) -> AuthResult<()>;

    /// Update a user's role. Returns the number of rows affected.
    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> AuthResult<u64>;

    /// Delete a user. Returns the number of rows affected.
    async fn delete_user(&self, user_id: UserId) -> AuthResult<u64>;
}

/// Refresh token repository trait
///
/// Only the SHA-256 digest of a refresh token is ever persisted, so
/// the interface speaks digests, not raw tokens.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a freshly issued refresh token digest
    async fn insert_refresh_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Atomically consume an unexpired refresh token, returning its
    /// owner. Exactly one concurrent caller can win; everyone else
    /// sees `None`.
    async fn consume_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>>;

    /// Delete a refresh token by digest. Deleting an unknown digest is
    /// not an error.
    async fn delete_refresh_token(&self, token_hash: &str) -> AuthResult<()>;
}

/// Email verification token repository trait
#[trait_variant::make(VerificationTokenRepository: Send)]
pub trait LocalVerificationTokenRepository {
    /// Persist a new verification token
    async fn insert_verification_token(&self, token: &NewVerificationToken) -> AuthResult<()>;

    /// Find a verification token by its raw value
    async fn find_verification_token(&self, token: &str) -> AuthResult<Option<VerificationToken>>;

    /// Mark a token used, guarded so only the first caller succeeds.
    /// Returns false when the token was already used.
    async fn mark_verification_token_used(
        &self,
        id: kernel::id::VerificationTokenId,
    ) -> AuthResult<bool>;
}

/// Two-factor enrollment repository trait
#[trait_variant::make(TwoFactorRepository: Send)]
pub trait LocalTwoFactorRepository {
    /// Insert or replace the user's enrollment secret. A replaced
    /// enrollment always comes back disabled.
    async fn upsert_two_factor_secret(&self, user_id: UserId, secret: &TotpSecret)
        -> AuthResult<()>;

    /// Find the user's enrollment
    async fn find_two_factor_by_user_id(
        &self,
        user_id: UserId,
    ) -> AuthResult<Option<TwoFactorEnrollment>>;

    /// Flip the enrollment's enabled flag
    async fn set_two_factor_enabled(&self, user_id: UserId, enabled: bool) -> AuthResult<()>;

    /// Remove the user's enrollment entirely
    async fn delete_two_factor(&self, user_id: UserId) -> AuthResult<()>;
}

/// Combined persistence surface the auth flows run against.
pub trait AuthStore:
    UserRepository
    + RefreshTokenRepository
    + VerificationTokenRepository
    + TwoFactorRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + RefreshTokenRepository
        + VerificationTokenRepository
        + TwoFactorRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
