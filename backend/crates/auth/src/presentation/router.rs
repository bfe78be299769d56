//! Auth Router

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::application::access_token::AccessTokenIssuer;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::mailer::{Mailer, SmtpMailer};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the auth router with the PostgreSQL repository and SMTP
/// mailer. Mount under `/api/auth`.
pub fn auth_router(repo: PgAuthRepository, mailer: SmtpMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create the auth router for any repository and mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(AccessTokenIssuer::new(
        &config.jwt_secret,
        config.access_token_ttl,
    ));

    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        tokens: tokens.clone(),
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me::<R, M>))
        .route("/2fa/setup", post(handlers::two_factor_setup::<R, M>))
        .route("/2fa/enable", post(handlers::two_factor_enable::<R, M>))
        .route("/2fa/disable", post(handlers::two_factor_disable::<R, M>))
        .layer(middleware::from_fn_with_state(tokens, require_auth));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/2fa/verify", post(handlers::two_factor_verify::<R, M>))
        .route("/refresh", post(handlers::refresh::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/verify-email", post(handlers::verify_email::<R, M>))
        .route(
            "/resend-verification",
            post(handlers::resend_verification::<R, M>),
        )
        .merge(protected)
        .with_state(state)
}

/// Create the admin user-management router. Mount under `/api/users`.
pub fn users_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(AccessTokenIssuer::new(
        &config.jwt_secret,
        config.access_token_ttl,
    ));

    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        tokens: tokens.clone(),
        config: Arc::new(config),
    };

    Router::new()
        .route("/{id}/role", patch(handlers::update_user_role::<R, M>))
        .route("/{id}", delete(handlers::delete_user::<R, M>))
        .layer(middleware::from_fn_with_state(tokens, require_auth))
        .with_state(state)
}

/// Admin user-management router for the PostgreSQL repository
pub fn users_router(repo: PgAuthRepository, mailer: SmtpMailer, config: AuthConfig) -> Router {
    users_router_generic(repo, mailer, config)
}
