//! Refresh Token Value Object
//!
//! Opaque session key handed to the client in an HttpOnly cookie.
//! The raw value is the session's primary key; logs only ever see its tag.

use platform::crypto::{log_tag, random_token};
use std::fmt;

/// Entropy per refresh value, in bytes
pub const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Fresh value from the OS CSPRNG (base64url, no padding)
    pub fn generate() -> Self {
        Self(random_token(REFRESH_TOKEN_BYTES))
    }

    /// Wrap a value presented by a client or read from storage
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-reversible tag for logs
    pub fn tag(&self) -> String {
        log_tag(&self.0)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&self.tag()).finish()
    }
}
