pub mod two_factor;
pub mod user;
pub mod verification_token;

pub use two_factor::TwoFactorEnrollment;
pub use user::{NewUser, User};
pub use verification_token::{NewVerificationToken, VerificationToken};
