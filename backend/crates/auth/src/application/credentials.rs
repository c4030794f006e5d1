//! Credential Store
//!
//! Owns user identity records: registration, password verification and
//! read-only existence/role lookups. Argon2 work runs on the blocking pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct CredentialStore<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CredentialStore<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Hash the password and persist a new user.
    ///
    /// Uniqueness is decided by the repository insert, so two concurrent
    /// registrations of one name cannot both succeed.
    pub async fn register(
        &self,
        user_name: UserName,
        email: Email,
        password: RawPassword,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> AuthResult<User> {
        let pepper = self.config.password_pepper.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&password, pepper.as_deref())
        })
        .await??;

        let user = User::new(user_name, email, password_hash, role, now);
        self.repo.insert_user(&user).await?;

        Ok(user)
    }

    /// Resolve `identifier` as username or email and check the password.
    ///
    /// An unknown identifier still costs one Argon2 verification and yields
    /// the same `InvalidCredentials` as a wrong password.
    pub async fn verify(&self, identifier: &str, password: RawPassword) -> AuthResult<User> {
        let canonical = UserName::canonicalize(identifier);
        let candidate = self.repo.find_user_by_identifier(&canonical).await?;

        let pepper = self.config.password_pepper.clone();
        let verified = tokio::task::spawn_blocking(move || match candidate {
            Some(user) if user.password_hash.verify(&password, pepper.as_deref()) => Some(user),
            Some(_) => None,
            None => {
                password.verify_decoy(pepper.as_deref());
                None
            }
        })
        .await?;

        verified.ok_or(AuthError::InvalidCredentials)
    }

    pub async fn exists(&self, user_id: &UserId) -> AuthResult<bool> {
        self.repo.user_exists(user_id).await
    }

    pub async fn role_of(&self, user_id: &UserId) -> AuthResult<UserRole> {
        self.repo
            .find_user_by_id(user_id)
            .await?
            .map(|user| user.user_role)
            .ok_or(AuthError::UserNotFound)
    }
}
