//! Auth Middleware
//!
//! Bearer token authentication and role checks. Verified claims are
//! attached as a request extension so handlers never re-verify.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::access_token::{AccessClaims, AccessTokenIssuer};
use crate::domain::value_object::UserRole;
use crate::error::{AuthError, AuthResult};

/// Require a valid Bearer access token.
pub async fn require_auth(
    State(tokens): State<Arc<AccessTokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer_token(&req)?;
    let claims = tokens.verify(token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> AuthResult<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidAccessToken)
}

/// Single role check used by every role-gated handler. Privilege is
/// ordered, so an admin passes an organizer gate.
pub fn authorize(claims: &AccessClaims, required: UserRole) -> AuthResult<()> {
    if claims.user_role().can_act_as(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(required.code().to_string()))
    }
}
