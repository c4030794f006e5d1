//! Identity Query
//!
//! Read-only "does user X exist / what is X's role" for other services.
//! Needs no session; restricting callers is a network-boundary concern.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::credentials::CredentialStore;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

pub struct IdentityQuery<R>
where
    R: UserRepository,
{
    credentials: CredentialStore<R>,
}

impl<R> IdentityQuery<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            credentials: CredentialStore::new(repo, config),
        }
    }

    /// A string that is not a user id names no user
    pub async fn exists(&self, raw_user_id: &str) -> AuthResult<bool> {
        match raw_user_id.trim().parse::<UserId>() {
            Ok(user_id) => self.credentials.exists(&user_id).await,
            Err(_) => Ok(false),
        }
    }

    pub async fn role_of(&self, user_id: &UserId) -> AuthResult<UserRole> {
        self.credentials.role_of(user_id).await
    }
}
