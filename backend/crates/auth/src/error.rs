//! Auth Error Types
//!
//! Auth-specific failures and their mapping onto the unified
//! `kernel::error::AppError` response format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::fmt;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity attribute that must be unique
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Username,
    Email,
}

impl IdentityField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdentityField::Username => "username",
            IdentityField::Email => "email",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input, rejected before any store access
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Username or email already registered
    #[error("A user with this {0} already exists")]
    DuplicateIdentity(IdentityField),

    /// Unknown identifier or wrong password. Never say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No refresh cookie, or no bearer token on a protected route
    #[error("Authentication token missing")]
    MissingToken,

    /// Refresh token unknown or expired. Never say which.
    #[error("Session expired or unknown")]
    SessionExpiredOrUnknown,

    /// Access token failed structural or signature checks
    #[error("Access token is malformed")]
    TokenMalformed,

    /// Access token signature is valid but it has expired
    #[error("Access token has expired")]
    TokenExpired,

    /// User id does not exist
    #[error("User not found")]
    UserNotFound,

    /// Refresh value collided with an existing session
    #[error("Session token already exists")]
    SessionConflict,

    /// Storage backend unreachable or returned an unexpected error
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Shorthand for a field-level validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation { .. } => ErrorKind::BadRequest,
            AuthError::DuplicateIdentity(_) => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::SessionExpiredOrUnknown
            | AuthError::TokenMalformed
            | AuthError::TokenExpired => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::SessionConflict | AuthError::Storage(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::SessionExpiredOrUnknown => "SESSION_EXPIRED_OR_UNKNOWN",
            AuthError::TokenMalformed => "TOKEN_MALFORMED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::UserNotFound => "NOT_FOUND",
            AuthError::SessionConflict | AuthError::Storage(_) => "STORAGE_FAILURE",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string()).with_code(self.code());
        match self {
            AuthError::Validation { field, .. } => err.with_field(*field),
            AuthError::DuplicateIdentity(field) => err.with_field(field.as_str()),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage failure");
            }
            AuthError::SessionConflict => {
                tracing::error!("Refresh token collision persisted after retries");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionExpiredOrUnknown => {
                tracing::info!("Refresh with expired or unknown session");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {}", err))
    }
}
