//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::Extension;
use std::sync::Arc;

use kernel::id::UserId;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

use crate::application::access_token::{AccessClaims, AccessTokenIssuer};
use crate::application::admin::ManageUsersUseCase;
use crate::application::config::AuthConfig;
use crate::application::refresh::RefreshUseCase;
use crate::application::session::{IssuedSession, SessionIssuer};
use crate::application::sign_in::{SignInOutput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::two_factor::TwoFactorSetupUseCase;
use crate::application::verify_email::VerifyEmailUseCase;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::domain::value_object::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::infra::mailer::Mailer;
use crate::presentation::dto::{
    AuthSuccessResponse, LoginRequest, MessageResponse, ResendVerificationRequest, SignUpRequest,
    TwoFactorChallengeResponse, TwoFactorDisableRequest, TwoFactorEnableRequest,
    TwoFactorSetupResponse, TwoFactorVerifyRequest, UpdateRoleRequest, UserResponse,
    VerifyEmailRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, M>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub tokens: Arc<AccessTokenIssuer>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> Clone for AuthAppState<R, M>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, M> AuthAppState<R, M>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    fn sessions(&self) -> SessionIssuer<R> {
        SessionIssuer::new(self.repo.clone(), self.tokens.clone(), self.config.clone())
    }

    fn sign_in_use_case(&self) -> SignInUseCase<R, R, R> {
        SignInUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.sessions(),
            self.config.clone(),
        )
    }

    /// Success response: access token in the body, refresh token in
    /// an HttpOnly cookie.
    fn session_response(&self, session: IssuedSession) -> impl IntoResponse + use<R, M> {
        let cookie = set_cookie_header(&self.config.refresh_cookie(), &session.refresh_token);

        (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(AuthSuccessResponse {
                user: UserResponse::from(&session.user),
                access_token: session.access_token,
            }),
        )
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    req.validate()?;

    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case
        .execute(SignUpInput {
            email: req.email,
            display_name: req.name.trim().to_string(),
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account created. Please check your email to verify your address.",
        )),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<axum::response::Response>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let output = state
        .sign_in_use_case()
        .execute(&req.email, &req.password)
        .await?;

    match output {
        SignInOutput::TwoFactorRequired { user_id } => Ok((
            StatusCode::OK,
            Json(TwoFactorChallengeResponse {
                requires_2fa: true,
                user_id: user_id.as_i64(),
            }),
        )
            .into_response()),
        SignInOutput::Authenticated(session) => {
            Ok(state.session_response(session).into_response())
        }
    }
}

/// POST /api/auth/2fa/verify
pub async fn two_factor_verify<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<TwoFactorVerifyRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let session = state
        .sign_in_use_case()
        .complete_two_factor(UserId::from_i64(req.user_id), &req.code)
        .await?;

    Ok(state.session_response(session))
}

// ============================================================================
// Refresh / Logout
// ============================================================================

/// POST /api/auth/refresh
///
/// Any failure clears the refresh cookie so the client does not keep
/// replaying a dead token.
pub async fn refresh<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let cookie_config = state.config.refresh_cookie();

    let result = match extract_cookie(&headers, &cookie_config.name) {
        None => Err(AuthError::InvalidRefreshToken),
        Some(raw) => {
            let use_case = RefreshUseCase::new(
                state.repo.clone(),
                state.repo.clone(),
                state.sessions(),
            );
            use_case.execute(&raw).await
        }
    };

    match result {
        Ok(session) => state.session_response(session).into_response(),
        Err(err) => {
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(header::SET_COOKIE, delete_cookie_header(&cookie_config));
            response
        }
    }
}

/// POST /api/auth/logout
///
/// Idempotent: succeeds with or without a live refresh token.
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let cookie_config = state.config.refresh_cookie();
    let raw = extract_cookie(&headers, &cookie_config.name);

    SignOutUseCase::new(state.repo.clone())
        .execute(raw.as_deref())
        .await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, delete_cookie_header(&cookie_config))],
    ))
}

// ============================================================================
// Email Verification
// ============================================================================

/// POST /api/auth/verify-email
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<VerifyEmailRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.token).await?;

    Ok(Json(MessageResponse::new("Email verified successfully.")))
}

/// POST /api/auth/resend-verification
pub async fn resend_verification<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ResendVerificationRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.resend(&req.email).await?;

    Ok(Json(MessageResponse::new("Verification email sent.")))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let user = state
        .repo
        .find_user_by_id(claims.user_id()?)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Two-Factor Setup (requires authentication)
// ============================================================================

/// POST /api/auth/2fa/setup
pub async fn two_factor_setup<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
) -> AuthResult<Json<TwoFactorSetupResponse>>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let use_case =
        TwoFactorSetupUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let setup = use_case.setup(claims.user_id()?).await?;

    Ok(Json(TwoFactorSetupResponse {
        secret: setup.secret,
        otpauth_url: setup.otpauth_url,
        qr_code: setup.qr_code_base64,
    }))
}

/// POST /api/auth/2fa/enable
pub async fn two_factor_enable<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
    Json(req): Json<TwoFactorEnableRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let use_case =
        TwoFactorSetupUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case.confirm(claims.user_id()?, &req.code).await?;

    Ok(Json(MessageResponse::new(
        "Two-factor authentication enabled.",
    )))
}

/// POST /api/auth/2fa/disable
pub async fn two_factor_disable<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
    Json(req): Json<TwoFactorDisableRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    let use_case =
        TwoFactorSetupUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case.disable(claims.user_id()?, &req.code).await?;

    Ok(Json(MessageResponse::new(
        "Two-factor authentication disabled.",
    )))
}

// ============================================================================
// User Administration (admin only)
// ============================================================================

/// PATCH /api/users/{id}/role
pub async fn update_user_role<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    crate::presentation::middleware::authorize(&claims, UserRole::Admin)?;

    ManageUsersUseCase::new(state.repo.clone())
        .update_role(claims.user_id()?, UserId::from_i64(user_id), req.role)
        .await?;

    Ok(Json(MessageResponse::new("User role updated.")))
}

/// DELETE /api/users/{id}
pub async fn delete_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(claims): Extension<AccessClaims>,
    Path(user_id): Path<i64>,
) -> AuthResult<StatusCode>
where
    R: AuthStore,
    M: Mailer + Send + Sync + 'static,
{
    crate::presentation::middleware::authorize(&claims, UserRole::Admin)?;

    ManageUsersUseCase::new(state.repo.clone())
        .delete(claims.user_id()?, UserId::from_i64(user_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
