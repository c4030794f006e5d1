//! Session Entity
//!
//! Binds a refresh token to its owner and an absolute expiry.
//! Expired rows are dead even before the reaper purges them.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{
    refresh_token::RefreshToken, user_id::UserId, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct Session {
    /// Primary key
    pub token: RefreshToken,
    pub user_id: UserId,
    /// Owner's role when the session was opened (roles never change)
    pub user_role: UserRole,
    /// Free-text client description, informational only
    pub device_info: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        token: RefreshToken,
        user_id: UserId,
        user_role: UserRole,
        device_info: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> AuthResult<Self> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal("Session expiry out of range".to_string()))?;

        Ok(Self {
            token,
            user_id,
            user_role,
            device_info,
            expires_at,
            created_at: now,
        })
    }

    /// Valid on `[created_at, expires_at)`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
