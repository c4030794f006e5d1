//! Token Issuer
//!
//! Mints and verifies access tokens (HS256 JWT) and generates refresh values.
//! Verification needs only the signing key, never a storage round-trip.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::{
    refresh_token::RefreshToken, user_id::UserId, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    role: UserRole,
    /// Issued at (unix seconds)
    iat: i64,
    /// Expiry (unix seconds)
    exp: i64,
    /// Unique per token
    jti: String,
}

/// Signed access token and its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity proven by a valid access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccess {
    pub user_id: UserId,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.signing_secret),
            decoding_key: DecodingKey::from_secret(&config.signing_secret),
            access_ttl: config.access_token_ttl_chrono(),
        }
    }

    /// Mint an access token expiring at `now + access_ttl`
    pub fn issue_access_token(
        &self,
        user_id: &UserId,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> AuthResult<AccessToken> {
        // Whole seconds; `exp` may land up to 1s before `now + access_ttl`
        let iat = now.timestamp();
        let exp = iat.saturating_add(self.access_ttl.num_seconds());

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {}", e)))?;

        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Internal("Access token expiry out of range".to_string()))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Check signature and structure first (`TokenMalformed`), then expiry
    /// (`TokenExpired` once `now` is past `exp`).
    pub fn verify_access_token(&self, token: &str, now: DateTime<Utc>) -> AuthResult<VerifiedAccess> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is judged against the caller's clock below
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            AuthError::TokenMalformed
        })?;
        let claims = data.claims;

        let user_id: UserId = claims.sub.parse().map_err(|_| AuthError::TokenMalformed)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::TokenMalformed)?;

        if now > expires_at {
            return Err(AuthError::TokenExpired);
        }

        Ok(VerifiedAccess {
            user_id,
            role: claims.role,
            expires_at,
        })
    }

    /// Fresh opaque refresh value
    pub fn generate_refresh_value(&self) -> RefreshToken {
        RefreshToken::generate()
    }
}
