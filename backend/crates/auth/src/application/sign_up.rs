//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::credentials::CredentialStore;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::RawPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub secret: String,
    /// `student` when omitted
    pub role: Option<String>,
}

/// Sign up output (never carries the secret)
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub user_role: UserRole,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    credentials: CredentialStore<R>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            credentials: CredentialStore::new(repo, config),
        }
    }

    pub async fn execute(&self, input: SignUpInput, now: DateTime<Utc>) -> AuthResult<SignUpOutput> {
        // Shape checks, all before touching the store
        let user_name = UserName::new(&input.username)
            .map_err(|e| AuthError::validation("username", e.to_string()))?;
        let email =
            Email::new(&input.email).map_err(|e| AuthError::validation("email", e.to_string()))?;
        let password = RawPassword::new(input.secret)?;
        let role = parse_requested_role(input.role.as_deref())?;

        let user = self
            .credentials
            .register(user_name, email, password, role, now)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            role = %user.user_role,
            "User signed up"
        );

        Ok(SignUpOutput {
            user_id: user.user_id,
            user_name: user.user_name,
            email: user.email,
            user_role: user.user_role,
        })
    }
}

fn parse_requested_role(role: Option<&str>) -> AuthResult<UserRole> {
    let Some(code) = role else {
        return Ok(UserRole::default());
    };

    match code.parse::<UserRole>() {
        Ok(role) if role.is_self_assignable() => Ok(role),
        Ok(_) => Err(AuthError::validation(
            "role",
            "This role cannot be chosen at signup",
        )),
        Err(e) => Err(AuthError::validation("role", e.to_string())),
    }
}
