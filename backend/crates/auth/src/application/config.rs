//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens (HS256)
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime in days (7)
    pub refresh_token_days: i64,
    /// Name of the refresh token cookie
    pub refresh_cookie_name: String,
    /// Email verification token lifetime in hours (24)
    pub verification_token_hours: i64,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy for the refresh cookie
    pub cookie_same_site: SameSite,
    /// Issuer shown in authenticator apps
    pub totp_issuer: String,
    /// Base URL the verification link points at
    pub client_base_url: String,
    /// From address for outbound mail
    pub mail_from: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_days: 7,
            refresh_cookie_name: "refresh_token".to_string(),
            verification_token_hours: 24,
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            totp_issuer: "Evently".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            mail_from: "Evently <no-reply@evently.local>".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Refresh token lifetime as a chrono duration
    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_days)
    }

    /// Verification token lifetime as a chrono duration
    pub fn verification_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.verification_token_hours)
    }

    /// Cookie settings for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.refresh_token_days * 24 * 3600),
        }
    }

    /// Full verification link for a raw token
    pub fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/verify-email?token={}",
            self.client_base_url.trim_end_matches('/'),
            token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_settings() {
        let config = AuthConfig::default();
        let cookie = config.refresh_cookie();
        assert_eq!(cookie.name, "refresh_token");
        assert!(cookie.http_only);
        assert!(cookie.secure);
        assert_eq!(cookie.max_age_secs, Some(7 * 24 * 3600));
    }

    #[test]
    fn test_verification_link() {
        let config = AuthConfig {
            client_base_url: "https://app.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.verification_link("abc123"),
            "https://app.example.com/verify-email?token=abc123"
        );
    }
}
