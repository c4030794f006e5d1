//! Sign In Use Case
//!
//! Authenticates a user, opens a session and mints the first access token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::credentials::CredentialStore;
use crate::application::token::{AccessToken, TokenIssuer};
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    refresh_token::RefreshToken, user_id::UserId, user_password::RawPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Re-export DeviceInfo from platform
pub use platform::client::DeviceInfo;

/// Fresh refresh values tried before giving up on a collision
const MAX_SESSION_ATTEMPTS: usize = 3;

/// Sign in input
pub struct SignInInput {
    /// User name or email
    pub identifier: String,
    /// Password
    pub secret: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub access_token: AccessToken,
    /// Goes into the refresh cookie
    pub refresh_token: RefreshToken,
    pub user_id: UserId,
    pub user_role: UserRole,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    credentials: CredentialStore<R>,
    session_repo: Arc<R>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            credentials: CredentialStore::new(repo.clone(), config.clone()),
            session_repo: repo,
            issuer,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        device: DeviceInfo,
        now: DateTime<Utc>,
    ) -> AuthResult<SignInOutput> {
        if input.identifier.trim().is_empty() {
            return Err(AuthError::validation("identifier", "Identifier is required"));
        }
        let password = RawPassword::for_login(input.secret)?;

        let user = self.credentials.verify(&input.identifier, password).await?;

        let session = self
            .open_session(&user.user_id, user.user_role, device.describe(), now)
            .await?;

        // Minted only once the session row is durable
        let access_token = self
            .issuer
            .issue_access_token(&user.user_id, user.user_role, now)?;

        tracing::info!(
            user_id = %user.user_id,
            session = %session.token.tag(),
            device = %session.device_info,
            "User signed in"
        );

        Ok(SignInOutput {
            access_token,
            refresh_token: session.token,
            user_id: user.user_id,
            user_role: user.user_role,
        })
    }

    async fn open_session(
        &self,
        user_id: &UserId,
        role: UserRole,
        device_info: String,
        now: DateTime<Utc>,
    ) -> AuthResult<Session> {
        let ttl = self.config.refresh_token_ttl_chrono();

        for attempt in 1..=MAX_SESSION_ATTEMPTS {
            let session = Session::new(
                self.issuer.generate_refresh_value(),
                *user_id,
                role,
                device_info.clone(),
                now,
                ttl,
            )?;

            match self.session_repo.insert_session(&session).await {
                Ok(()) => return Ok(session),
                Err(AuthError::SessionConflict) => {
                    tracing::warn!(attempt, "Refresh token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AuthError::SessionConflict)
    }
}
