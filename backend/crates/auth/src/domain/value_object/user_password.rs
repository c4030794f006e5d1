//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. Clear text is zeroized on drop
//! and never printed; the stored form is an Argon2id PHC string.

use crate::error::{AuthError, AuthResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicyError, verify_against_decoy,
};
use std::fmt;

/// Password as submitted by the user
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password chosen at signup. Enforces the length and character policy.
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let message = match e {
                PasswordPolicyError::EmptyOrWhitespace => "Password cannot be empty".to_string(),
                other => other.to_string(),
            };
            AuthError::validation("secret", message)
        })?;

        Ok(Self(clear_text))
    }

    /// Password submitted at login. Only blank input is rejected.
    pub fn for_login(raw: String) -> AuthResult<Self> {
        if raw.trim().is_empty() {
            return Err(AuthError::validation("secret", "Password is required"));
        }
        Ok(Self(ClearTextPassword::for_verification(raw)))
    }

    /// Burn one Argon2 verification against a hash nobody can match
    pub fn verify_decoy(&self, pepper: Option<&[u8]>) -> bool {
        verify_against_decoy(&self.0, pepper)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password (Argon2id, fresh salt)
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        Ok(Self(raw.0.hash(pepper)?))
    }

    /// Load a PHC string read from storage
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in storage".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `pepper` must match the one used at hashing time
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
