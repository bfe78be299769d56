//! Two-Factor Enrollment Entity
//!
//! A user's TOTP enrollment. A row exists from setup onward; the
//! enrollment only gates login once `is_enabled` is set by a
//! successful confirmation.

use chrono::{DateTime, Utc};
use kernel::id::{TwoFactorSecretId, UserId};

use crate::domain::value_object::TotpSecret;

/// TOTP enrollment record
#[derive(Debug, Clone)]
pub struct TwoFactorEnrollment {
    pub id: TwoFactorSecretId,
    pub user_id: UserId,
    pub secret: TotpSecret,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
