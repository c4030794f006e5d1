//! In-Memory Repository Implementation
//!
//! Process-local store for development and tests. One lock guards users and
//! sessions, so uniqueness checks and inserts happen atomically.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{refresh_token::RefreshToken, user_id::UserId};
use crate::error::{AuthError, AuthResult, IdentityField};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    sessions: HashMap<RefreshToken, Session>,
}

/// In-memory auth repository. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write().await;

        for existing in tables.users.values() {
            if existing.user_name.canonical() == user.user_name.canonical() {
                return Err(AuthError::DuplicateIdentity(IdentityField::Username));
            }
            if existing.email == user.email {
                return Err(AuthError::DuplicateIdentity(IdentityField::Email));
            }
        }

        tables.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn find_user_by_identifier(&self, canonical: &str) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.matches_identifier(canonical))
            .cloned())
    }

    async fn user_exists(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.tables.read().await.users.contains_key(user_id))
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn insert_session(&self, session: &Session) -> AuthResult<()> {
        let mut tables = self.tables.write().await;

        if tables.sessions.contains_key(&session.token) {
            return Err(AuthError::SessionConflict);
        }

        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_active_session(
        &self,
        token: &RefreshToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .get(token)
            .filter(|session| session.is_active(now))
            .cloned())
    }

    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| session.is_active(now));
        let deleted = (before - tables.sessions.len()) as u64;

        tracing::debug!(sessions_deleted = deleted, "Cleaned up expired sessions");
        Ok(deleted)
    }
}
