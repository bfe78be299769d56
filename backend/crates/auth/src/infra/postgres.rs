//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use kernel::id::{TwoFactorSecretId, UserId, VerificationTokenId};

use crate::domain::entity::{
    NewUser, NewVerificationToken, TwoFactorEnrollment, User, VerificationToken,
};
use crate::domain::repository::{
    RefreshTokenRepository, TwoFactorRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{Email, PasswordHash, TotpSecret, UserRole};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired refresh tokens. Expired rows are already
    /// unusable; this just reclaims space. Verification tokens are
    /// never deleted: used and expired rows must keep reporting their
    /// own failure kind on redemption.
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired refresh tokens");

        Ok(deleted)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_user(&self, user: &NewUser) -> AuthResult<UserId> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, display_name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(user.password_hash.as_str())
        .bind(user.role.id())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(UserId::from_i64(id)),
            Err(e) if is_unique_violation(&e) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, password_hash, role,
                   email_verified, totp_enabled, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, password_hash, role,
                   email_verified, totp_enabled, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn set_email_verified(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_totp_enabled(&self, user_id: UserId, enabled: bool) -> AuthResult<()> {
        sqlx::query("UPDATE users SET totp_enabled = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id.as_i64())
            .bind(enabled)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> AuthResult<u64> {
        let affected =
            sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id.as_i64())
                .bind(role.id())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(affected)
    }

    async fn delete_user(&self, user_id: UserId) -> AuthResult<u64> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn insert_refresh_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id.as_i64())
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<UserId>> {
        // DELETE .. RETURNING is atomic: of two concurrent redeemers,
        // exactly one gets the row back.
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            DELETE FROM refresh_tokens
            WHERE token_hash = $1 AND expires_at > $2
            RETURNING user_id
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id.map(UserId::from_i64))
    }

    async fn delete_refresh_token(&self, token_hash: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Verification Token Repository Implementation
// ============================================================================

impl VerificationTokenRepository for PgAuthRepository {
    async fn insert_verification_token(&self, token: &NewVerificationToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO email_verifications (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.user_id.as_i64())
        .bind(&token.token)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_verification_token(&self, token: &str) -> AuthResult<Option<VerificationToken>> {
        let row = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
            SELECT id, user_id, token, is_used, expires_at, created_at
            FROM email_verifications
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VerificationTokenRow::into_token))
    }

    async fn mark_verification_token_used(&self, id: VerificationTokenId) -> AuthResult<bool> {
        let affected = sqlx::query(
            "UPDATE email_verifications SET is_used = TRUE WHERE id = $1 AND is_used = FALSE",
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Two-Factor Repository Implementation
// ============================================================================

impl TwoFactorRepository for PgAuthRepository {
    async fn upsert_two_factor_secret(
        &self,
        user_id: UserId,
        secret: &TotpSecret,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO two_factor_secrets (user_id, secret, is_enabled)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (user_id)
            DO UPDATE SET secret = EXCLUDED.secret,
                          is_enabled = FALSE,
                          updated_at = NOW()
            "#,
        )
        .bind(user_id.as_i64())
        .bind(secret.as_base32())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_two_factor_by_user_id(
        &self,
        user_id: UserId,
    ) -> AuthResult<Option<TwoFactorEnrollment>> {
        let row = sqlx::query_as::<_, TwoFactorRow>(
            r#"
            SELECT id, user_id, secret, is_enabled, created_at, updated_at
            FROM two_factor_secrets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_enrollment()).transpose()
    }

    async fn set_two_factor_enabled(&self, user_id: UserId, enabled: bool) -> AuthResult<()> {
        sqlx::query(
            "UPDATE two_factor_secrets SET is_enabled = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id.as_i64())
        .bind(enabled)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_two_factor(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("DELETE FROM two_factor_secrets WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    display_name: String,
    password_hash: String,
    role: i16,
    email_verified: bool,
    totp_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_id(self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role id in users: {}", self.role)))?;

        Ok(User {
            user_id: UserId::from_i64(self.id),
            email: Email::from_db(self.email),
            display_name: self.display_name,
            password_hash: PasswordHash::from_db(self.password_hash),
            role,
            email_verified: self.email_verified,
            totp_enabled: self.totp_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VerificationTokenRow {
    id: i64,
    user_id: i64,
    token: String,
    is_used: bool,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl VerificationTokenRow {
    fn into_token(self) -> VerificationToken {
        VerificationToken {
            id: VerificationTokenId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            token: self.token,
            is_used: self.is_used,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TwoFactorRow {
    id: i64,
    user_id: i64,
    secret: String,
    is_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TwoFactorRow {
    fn into_enrollment(self) -> AuthResult<TwoFactorEnrollment> {
        let secret = TotpSecret::from_base32(self.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TwoFactorEnrollment {
            id: TwoFactorSecretId::from_i64(self.id),
            user_id: UserId::from_i64(self.user_id),
            secret,
            is_enabled: self.is_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
