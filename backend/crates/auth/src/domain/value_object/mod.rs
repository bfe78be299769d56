pub mod email;
pub mod password_hash;
pub mod totp_secret;
pub mod user_role;

pub use email::Email;
pub use password_hash::PasswordHash;
pub use totp_secret::TotpSecret;
pub use user_role::UserRole;
