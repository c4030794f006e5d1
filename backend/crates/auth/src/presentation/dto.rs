//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    #[serde(alias = "password")]
    pub secret: String,
    /// `student` (default) or `alumni`
    #[serde(default)]
    pub role: Option<String>,
}

/// Created identity, without the secret
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

// ============================================================================
// Login / Refresh
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// User name or email
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    #[serde(alias = "password")]
    pub secret: String,
}

/// Access token body returned by login and refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: &'static str,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub user_id: Uuid,
    pub role: UserRole,
}

// ============================================================================
// Session Status
// ============================================================================

/// Identity behind a valid bearer token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Identity Query
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleResponse {
    pub user_id: Uuid,
    pub role: UserRole,
}
