//! User Entity
//!
//! Identity record owned by the credential store. Never deleted here.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique on its canonical form
    pub user_name: UserName,
    /// Unique
    pub email: Email,
    pub password_hash: UserPassword,
    /// Immutable after creation
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: UserName,
        email: Email,
        password_hash: UserPassword,
        user_role: UserRole,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password_hash,
            user_role,
            created_at: now,
        }
    }

    /// Whether a login identifier (already canonicalized) names this user
    pub fn matches_identifier(&self, canonical: &str) -> bool {
        self.user_name.canonical() == canonical || self.email.as_str() == canonical
    }
}
