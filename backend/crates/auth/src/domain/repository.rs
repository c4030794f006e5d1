//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.
//! Method names are distinct across traits so one store can implement both.

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{refresh_token::RefreshToken, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user.
    ///
    /// Fails `DuplicateIdentity` naming the conflicting field when the
    /// canonical username or the email is taken.
    async fn insert_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find by canonical username or email, in one lookup
    async fn find_user_by_identifier(&self, canonical: &str) -> AuthResult<Option<User>>;

    async fn user_exists(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a new session. Fails `SessionConflict` if the token exists.
    async fn insert_session(&self, session: &Session) -> AuthResult<()>;

    /// Session for `token` if it exists and `now < expires_at`
    async fn find_active_session(
        &self,
        token: &RefreshToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>>;

    /// Delete a session. Deleting a missing token is not an error.
    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Purge sessions with `expires_at <= now`, returning how many went
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}

/// Everything the HTTP layer needs from one shared store handle
pub trait AuthStore: UserRepository + SessionRepository + Clone + Send + Sync + 'static {}

impl<T> AuthStore for T where T: UserRepository + SessionRepository + Clone + Send + Sync + 'static {}
