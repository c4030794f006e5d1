//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic helpers (CSPRNG tokens, SHA-256 digests)
//! - Password hashing (Argon2id)
//! - Cookie building and parsing
//! - Client/device identification from request headers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
