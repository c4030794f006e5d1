//! User Name Value Object
//!
//! Public handle used at login and shown to other services.
//!
//! Processing order: NFKC, trim, lowercase, validate. The display form keeps
//! the submitted case; uniqueness is decided on the lowercase canonical form.
//!
//! Rules (after normalization):
//! - 3..=30 characters from `a-z 0-9 _ . - +`
//! - starts and ends with a letter, digit or `_`
//! - no `..`, at least one letter or digit
//! - not a reserved route or system word

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Names that collide with routes or read as system accounts
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "signup",
    "refresh",
    "user",
    "users",
    "me",
    "null",
    "undefined",
    "anonymous",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Username is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Username cannot contain whitespace")]
    ContainsWhitespace,

    #[error("Invalid character '{ch}' at position {position}. Only a-z, 0-9, _, ., -, + are allowed")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Username must start and end with a-z, 0-9 or _")]
    InvalidBoundary,

    #[error("Username cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("Username must contain at least one letter or digit")]
    NoAlphanumeric,

    #[error("'{0}' is a reserved username")]
    Reserved(String),
}

/// Validated, normalized user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    /// Submitted form after NFKC and trim (case preserved)
    original: String,
    /// Lowercase form used for uniqueness and lookup
    canonical: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original: String = input.as_ref().nfkc().collect::<String>().trim().to_string();
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Canonical form of arbitrary login input, without validation.
    ///
    /// Used to match an identifier against stored canonical names.
    pub fn canonicalize(input: &str) -> String {
        super::canonicalize_identifier(input)
    }

    /// Rebuild from a stored row (already validated on insert)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    fn validate(canonical: &str) -> Result<(), UserNameError> {
        let length = canonical.chars().count();
        if length == 0 {
            return Err(UserNameError::Empty);
        }
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if canonical.chars().any(char::is_whitespace) {
            return Err(UserNameError::ContainsWhitespace);
        }

        if let Some((position, ch)) = canonical
            .chars()
            .enumerate()
            .find(|(_, c)| !Self::is_valid_char(*c))
        {
            return Err(UserNameError::InvalidCharacter { ch, position });
        }

        let first = canonical.chars().next();
        let last = canonical.chars().next_back();
        if !first.is_some_and(Self::is_valid_boundary_char)
            || !last.is_some_and(Self::is_valid_boundary_char)
        {
            return Err(UserNameError::InvalidBoundary);
        }

        if canonical.contains("..") {
            return Err(UserNameError::ConsecutiveDots);
        }

        if !canonical.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::NoAlphanumeric);
        }

        if RESERVED_WORDS.contains(&canonical) {
            return Err(UserNameError::Reserved(canonical.to_string()));
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }

    #[inline]
    fn is_valid_boundary_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.original).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}
