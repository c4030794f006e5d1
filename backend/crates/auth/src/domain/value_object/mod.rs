//! Value Object Module

pub mod email;
pub mod refresh_token;
pub mod user_id;
pub mod user_name;
pub mod user_password;
pub mod user_role;

use unicode_normalization::UnicodeNormalization;

/// NFKC, trim, lowercase. Stored usernames, stored emails and login
/// identifiers all share this form.
pub fn canonicalize_identifier(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}
