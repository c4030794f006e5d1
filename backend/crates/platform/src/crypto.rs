//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Fixed-size variant of [`random_bytes`], for keys
pub fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random opaque token: `len_bytes` of OS entropy, base64url without padding
pub fn random_token(len_bytes: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(len_bytes))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible tag for a secret value, safe to put in logs.
///
/// 72 bits of the SHA-256 digest, base64url encoded (12 chars).
pub fn log_tag(secret: &str) -> String {
    let digest = sha256(secret.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..9])
}

/// Encode bytes as base64url (no padding)
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url (no padding)
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}
