//! Client identification utilities
//!
//! Derives a human-readable device descriptor from request headers.

use axum::http::{HeaderMap, header};
use std::fmt;
use std::net::IpAddr;

/// Upper bound for stored device descriptors
pub const MAX_DEVICE_INFO_LENGTH: usize = 255;

/// Client description derived from request headers
///
/// Informational only; nothing is authorized on the basis of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// User-Agent header, if sent
    pub user_agent: Option<String>,
    /// Client IP address (from X-Forwarded-For / X-Real-IP)
    pub ip: Option<IpAddr>,
}

impl DeviceInfo {
    pub fn new(user_agent: Option<String>, ip: Option<IpAddr>) -> Self {
        Self { user_agent, ip }
    }

    /// Free-text descriptor for storage, truncated to [`MAX_DEVICE_INFO_LENGTH`]
    pub fn describe(&self) -> String {
        let text = self.to_string();
        match text.char_indices().nth(MAX_DEVICE_INFO_LENGTH) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let agent = self.user_agent.as_deref().unwrap_or("unknown");
        match self.ip {
            Some(ip) => write!(f, "{} ({})", agent, ip),
            None => f.write_str(agent),
        }
    }
}

/// Extract device info from request headers. Missing headers are not an error.
pub fn extract_device_info(headers: &HeaderMap) -> DeviceInfo {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(str::to_string);

    DeviceInfo::new(user_agent, extract_client_ip(headers))
}

/// Extract client IP address from proxy headers
///
/// Checks X-Forwarded-For (first entry), then X-Real-IP.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = xff
            .split(',')
            .next()
            .and_then(|first| first.trim().parse::<IpAddr>().ok())
        {
            return Some(ip);
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
}
