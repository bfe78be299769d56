//! Outbound Email
//!
//! Verification mail delivery over SMTP, with a log-only fallback for
//! local development.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Mail delivery trait
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send the email-verification message carrying `verify_url`.
    async fn send_verification(&self, to: &Email, verify_url: &str) -> AuthResult<()>;
}

/// SMTP settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address, e.g. `Evently <no-reply@evently.example>`
    pub from: String,
}

/// Mailer backed by an async SMTP transport
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> AuthResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AuthError::Mail(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    fn build_message(&self, to: &Email, verify_url: &str) -> AuthResult<Message> {
        let body = format!(
            "Welcome to Evently!\n\n\
             Please confirm your email address by opening the link below:\n\n\
             {}\n\n\
             The link expires in 24 hours. If you did not create an account, \
             you can safely ignore this email.\n",
            verify_url
        );

        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AuthError::Mail(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|e| AuthError::Mail(format!("Invalid recipient: {}", e)))?)
            .subject("Verify your email address")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AuthError::Mail(format!("Failed to build message: {}", e)))
    }
}

impl Mailer for SmtpMailer {
    async fn send_verification(&self, to: &Email, verify_url: &str) -> AuthResult<()> {
        let message = self.build_message(to, verify_url)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::Mail(format!("SMTP send failed: {}", e)))?;

        tracing::info!(to = %to, "Verification email sent");
        Ok(())
    }
}

/// Development mailer that logs the verification link instead of
/// sending anything.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_verification(&self, to: &Email, verify_url: &str) -> AuthResult<()> {
        tracing::info!(to = %to, url = %verify_url, "Verification email (log only)");
        Ok(())
    }
}
