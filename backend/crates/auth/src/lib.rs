//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential store, token issuer, use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Signup with username, email and password (student or alumni role)
//! - Login by username or email
//! - Short-lived HS256 access tokens, long-lived refresh sessions
//! - Refresh token in an HttpOnly cookie, never rotated
//! - Read-only identity lookups for other services
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown user and wrong password are indistinguishable
//! - Sessions expire by timestamp; a reaper purges dead rows

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{AuthStore, SessionRepository, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
