//! User Entity
//!
//! A registered account, including its credential hash and the flags
//! that gate the login flow.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{Email, PasswordHash, UserRole};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Database identifier
    pub user_id: UserId,
    /// Login email (unique, case-normalized)
    pub email: Email,
    /// Display name
    pub display_name: String,
    /// Argon2id password hash (PHC string)
    pub password_hash: PasswordHash,
    /// Role (Attendee, Organizer, Admin)
    pub role: UserRole,
    /// Whether ownership of the email has been proven
    pub email_verified: bool,
    /// Whether TOTP two-factor is active for this account
    pub totp_enabled: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Login is gated on email verification.
    pub fn can_login(&self) -> bool {
        self.email_verified
    }

    /// Whether login must complete a TOTP challenge.
    pub fn requires_2fa(&self) -> bool {
        self.totp_enabled
    }
}

/// Parameters for creating a user. The id and timestamps are assigned
/// by the database on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub display_name: String,
    pub password_hash: PasswordHash,
    pub role: UserRole,
}

impl NewUser {
    pub fn new(email: Email, display_name: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            email,
            display_name: display_name.into(),
            password_hash,
            role: UserRole::default(),
        }
    }
}
