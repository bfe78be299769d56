//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level failures are
//! handled inside the auth crate's error types.

use auth::infra::mailer::{Mailer, SmtpConfig};
use auth::router::{auth_router_generic, users_router_generic};
use auth::{AuthConfig, LogMailer, PgAuthRepository, SmtpMailer};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::cookie::SameSite;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired tokens.
    // Errors here should not prevent server startup.
    let repo = PgAuthRepository::new(pool.clone());
    match repo.cleanup_expired().await {
        Ok(deleted) => {
            tracing::info!(tokens_deleted = deleted, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Refresh token cleanup failed, continuing anyway");
        }
    }

    let config = load_auth_config()?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .or_else(|_| env::var("CLIENT_URL"))
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // SMTP is optional; without it, verification links go to the log.
    let app = match load_smtp_config(&config) {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "Using SMTP mailer");
            build_app(repo, SmtpMailer::new(&smtp)?, config)
        }
        None => {
            tracing::warn!("SMTP not configured, verification emails are logged only");
            build_app(repo, LogMailer, config)
        }
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let port = env_parse("PORT", 4000u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app<M>(repo: PgAuthRepository, mailer: M, config: AuthConfig) -> Router
where
    M: Mailer + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest(
            "/api/auth",
            auth_router_generic(repo.clone(), mailer.clone(), config.clone()),
        )
        .nest("/api/users", users_router_generic(repo, mailer, config))
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let jwt_secret = match env::var("JWT_SECRET") {
        Ok(secret) => secret.into_bytes(),
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random secret for this run");
            platform::crypto::random_bytes(32)
        }
        Err(_) => anyhow::bail!("JWT_SECRET must be set in production"),
    };

    let defaults = AuthConfig::default();

    Ok(AuthConfig {
        jwt_secret,
        access_token_ttl: Duration::from_secs(env_parse("ACCESS_TOKEN_TTL_MINUTES", 15u64) * 60),
        refresh_token_days: env_parse("REFRESH_TOKEN_DAYS", defaults.refresh_token_days),
        refresh_cookie_name: env::var("REFRESH_COOKIE_NAME")
            .unwrap_or(defaults.refresh_cookie_name),
        verification_token_hours: env_parse(
            "VERIFICATION_TOKEN_HOURS",
            defaults.verification_token_hours,
        ),
        cookie_secure: env_parse("COOKIE_SECURE", !cfg!(debug_assertions)),
        cookie_same_site: SameSite::Strict,
        totp_issuer: env::var("TOTP_ISSUER").unwrap_or(defaults.totp_issuer),
        client_base_url: env::var("CLIENT_URL").unwrap_or(defaults.client_base_url),
        mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
    })
}

fn load_smtp_config(config: &AuthConfig) -> Option<SmtpConfig> {
    let host = env::var("SMTP_HOST").ok()?;

    Some(SmtpConfig {
        host,
        port: env_parse("SMTP_PORT", 587u16),
        username: env::var("SMTP_USERNAME").unwrap_or_default(),
        password: env::var("SMTP_PASSWORD").unwrap_or_default(),
        from: config.mail_from.clone(),
    })
}

fn env_parse<T: FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
