//! Auth Middleware
//!
//! Bearer access-token check for protected routes. Needs only the signing
//! key, so it never touches the session store.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::token::{TokenIssuer, VerifiedAccess};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::AuthError;

/// Caller identity, inserted into request extensions by `require_access_token`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

impl From<VerifiedAccess> for AuthenticatedUser {
    fn from(access: VerifiedAccess) -> Self {
        Self {
            user_id: access.user_id,
            role: access.role,
            expires_at: access.expires_at,
        }
    }
}

/// Middleware that requires `Authorization: Bearer <access token>`
pub async fn require_access_token(
    State(issuer): State<Arc<TokenIssuer>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
    let access = issuer.verify_access_token(token, Utc::now())?;

    req.extensions_mut()
        .insert(AuthenticatedUser::from(access));

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
