pub mod mailer;
pub mod postgres;
