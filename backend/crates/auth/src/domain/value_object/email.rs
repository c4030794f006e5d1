//! Email Value Object
//!
//! Syntax check only. Ownership of the mailbox is never verified here.
//! Stored in canonical identifier form (NFKC, trim, lowercase).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::canonicalize_identifier;

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("Email must be at most {EMAIL_MAX_LENGTH} characters")]
    TooLong,

    #[error("Invalid email format")]
    InvalidFormat,
}

/// Canonical email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = canonicalize_identifier(email.as_ref());

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !Self::is_valid_format(&email) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }
        if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return false;
        }

        // Also rejects a second '@'
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !domain.is_empty()
            && domain.contains('.')
            && !domain.contains("..")
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
    }

    /// Rebuild from a stored row (already validated on insert)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, d)| d)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("alice@x.edu").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert_eq!(Email::new("  "), Err(EmailError::Empty));
        assert_eq!(Email::new("userexample.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("user@"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("@example.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("user@@example.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("user@example"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("user@.example.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("user@example..com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::new("us er@example.com"), Err(EmailError::InvalidFormat));
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::new(email), Err(EmailError::TooLong));
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new(" Alice@X.EDU ").unwrap();
        assert_eq!(email.as_str(), "alice@x.edu");
        assert_eq!(email.domain(), "x.edu");
    }

    #[test]
    fn test_email_compatibility_forms_fold() {
        // Fullwidth letters and at-sign
        let email = Email::new("\u{FF41}lice\u{FF20}X.edu").unwrap();
        assert_eq!(email.as_str(), "alice@x.edu");
        assert_eq!(email, Email::new("alice@x.edu").unwrap());
    }
}
