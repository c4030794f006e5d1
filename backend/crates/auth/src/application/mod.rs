//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credentials;
pub mod identity_query;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use credentials::CredentialStore;
pub use identity_query::IdentityQuery;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use sign_in::{DeviceInfo, SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{AccessToken, TokenIssuer, VerifiedAccess};
