//! Refresh Use Case
//!
//! Trades a live refresh token for a new access token. Read-only: the refresh
//! token is not rotated, so retries and concurrent refreshes are harmless.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::token::{AccessToken, TokenIssuer};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{
    refresh_token::RefreshToken, user_id::UserId, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Refresh output
pub struct RefreshOutput {
    pub access_token: AccessToken,
    pub user_id: UserId,
    pub user_role: UserRole,
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S> RefreshUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            session_repo,
            issuer,
        }
    }

    /// `token` is the refresh cookie value, if the client sent one
    pub async fn execute(
        &self,
        token: Option<RefreshToken>,
        now: DateTime<Utc>,
    ) -> AuthResult<RefreshOutput> {
        let token = token.ok_or(AuthError::MissingToken)?;

        let session = self
            .session_repo
            .find_active_session(&token, now)
            .await?
            .ok_or(AuthError::SessionExpiredOrUnknown)?;

        let access_token =
            self.issuer
                .issue_access_token(&session.user_id, session.user_role, now)?;

        tracing::debug!(
            user_id = %session.user_id,
            session = %token.tag(),
            "Access token refreshed"
        );

        Ok(RefreshOutput {
            access_token,
            user_id: session.user_id,
            user_role: session.user_role,
        })
    }
}
