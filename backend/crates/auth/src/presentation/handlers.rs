//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;

use platform::client::extract_device_info;

use crate::application::config::AuthConfig;
use crate::application::{
    IdentityQuery, RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase, TokenIssuer,
};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{
    refresh_token::RefreshToken, user_id::UserId, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, LoginRequest, MeResponse, SignUpRequest, SignUpResponse,
    UserRoleResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<TokenIssuer>,
}

impl<R> AuthAppState<R>
where
    R: AuthStore,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            issuer: Arc::new(issuer),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
{
    let Json(req) = payload.map_err(body_error)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        username: req.username,
        email: req.email,
        secret: req.secret,
        role: req.role,
    };

    let output = use_case.execute(input, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id: output.user_id.into_uuid(),
            username: output.user_name.to_string(),
            email: output.email.to_string(),
            role: output.user_role,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
{
    let Json(req) = payload.map_err(body_error)?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        identifier: req.identifier,
        secret: req.secret,
    };

    let output = use_case
        .execute(input, extract_device_info(&headers), Utc::now())
        .await?;

    let cookie = state
        .config
        .refresh_cookie()
        .set_cookie_header(output.refresh_token.as_str())
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(token_response(
            &state.config,
            output.access_token.token,
            output.user_id,
            output.user_role,
        )),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// GET /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<AccessTokenResponse>>
where
    R: AuthStore,
{
    let use_case = RefreshUseCase::new(state.repo.clone(), state.issuer.clone());

    let output = use_case
        .execute(refresh_cookie(&headers, &state.config), Utc::now())
        .await?;

    Ok(Json(token_response(
        &state.config,
        output.access_token.token,
        output.user_id,
        output.user_role,
    )))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
{
    let use_case = SignOutUseCase::new(state.repo.clone());
    use_case
        .execute(refresh_cookie(&headers, &state.config))
        .await?;

    let cookie: HeaderValue = state
        .config
        .refresh_cookie()
        .delete_cookie_header()
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {}", e)))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /auth/me (behind `require_access_token`)
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id.into_uuid(),
        role: user.role,
        expires_at: user.expires_at,
    })
}

// ============================================================================
// Identity Query
// ============================================================================

/// GET /user/{id}
pub async fn user_exists<R>(
    State(state): State<AuthAppState<R>>,
    Path(raw_id): Path<String>,
) -> AuthResult<Json<bool>>
where
    R: AuthStore,
{
    let query = IdentityQuery::new(state.repo.clone(), state.config.clone());
    Ok(Json(query.exists(&raw_id).await?))
}

/// GET /user/{id}/role
pub async fn user_role<R>(
    State(state): State<AuthAppState<R>>,
    Path(raw_id): Path<String>,
) -> AuthResult<Json<UserRoleResponse>>
where
    R: AuthStore,
{
    let user_id: UserId = raw_id.trim().parse().map_err(|_| AuthError::UserNotFound)?;

    let query = IdentityQuery::new(state.repo.clone(), state.config.clone());
    let role = query.role_of(&user_id).await?;

    Ok(Json(UserRoleResponse {
        user_id: user_id.into_uuid(),
        role,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn body_error(rejection: JsonRejection) -> AuthError {
    AuthError::validation("body", rejection.body_text())
}

fn refresh_cookie(headers: &HeaderMap, config: &AuthConfig) -> Option<RefreshToken> {
    platform::cookie::extract_cookie(headers, &config.refresh_cookie_name)
        .map(RefreshToken::from_raw)
}

fn token_response(
    config: &AuthConfig,
    access_token: String,
    user_id: UserId,
    role: UserRole,
) -> AccessTokenResponse {
    AccessTokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: config.access_token_ttl_secs(),
        user_id: user_id.into_uuid(),
        role,
    }
}
