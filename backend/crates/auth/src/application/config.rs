//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared read-only behind an `Arc`.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_array;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Refresh cookie name
    pub refresh_cookie_name: String,
    /// Refresh cookie path (the cookie is only sent to auth routes)
    pub refresh_cookie_path: String,
    /// HS256 key for access tokens (32 bytes)
    pub signing_secret: [u8; 32],
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token / session lifetime (1 week)
    pub refresh_token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_cookie_name: "refresh_token".to_string(),
            refresh_cookie_path: "/auth".to_string(),
            signing_secret: [0u8; 32],
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Config with a random signing secret. Tokens die with the process.
    pub fn with_random_secret() -> Self {
        Self {
            signing_secret: random_array(),
            ..Default::default()
        }
    }

    /// Config for local development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn access_token_ttl_secs(&self) -> i64 {
        i64::try_from(self.access_token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    pub fn access_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.access_token_ttl).unwrap_or(chrono::Duration::MAX)
    }

    pub fn refresh_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.refresh_token_ttl).unwrap_or(chrono::Duration::MAX)
    }

    /// Cookie attributes for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.refresh_cookie_path.clone(),
            max_age_secs: Some(self.refresh_token_ttl.as_secs()),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("refresh_cookie_path", &self.refresh_cookie_path)
            .field("signing_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.refresh_cookie_name, "refresh_token");
        assert_eq!(config.access_token_ttl_secs(), 900);
        assert_eq!(config.refresh_token_ttl_chrono(), chrono::Duration::days(7));
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_development_has_secret_and_insecure_cookie() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.signing_secret, [0u8; 32]);
        assert_ne!(
            config.signing_secret,
            AuthConfig::with_random_secret().signing_secret
        );
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = AuthConfig::default().refresh_cookie().build_set_cookie("abc");
        assert!(cookie.starts_with("refresh_token=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/auth"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("112, 101")); // "pe" bytes
    }
}
