//! Sign Out Use Case
//!
//! Revokes the session behind a refresh token.

use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::domain::value_object::refresh_token::RefreshToken;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Idempotent: no token, or an already dead one, is still a success
    pub async fn execute(&self, token: Option<RefreshToken>) -> AuthResult<()> {
        let Some(token) = token else {
            return Ok(());
        };

        self.session_repo.delete_session(&token).await?;

        tracing::info!(session = %token.tag(), "User signed out");
        Ok(())
    }
}
