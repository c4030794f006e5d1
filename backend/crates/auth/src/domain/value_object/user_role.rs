use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account role. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    Alumni = 1,
    Admin = 2,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Alumni => "alumni",
            UserRole::Admin => "admin",
        }
    }

    /// Roles a user may pick for themselves at signup
    #[inline]
    pub const fn is_self_assignable(&self) -> bool {
        matches!(self, UserRole::Student | UserRole::Alumni)
    }

    pub fn from_id(id: i16) -> Result<Self, UnknownRole> {
        match id {
            0 => Ok(UserRole::Student),
            1 => Ok(UserRole::Alumni),
            2 => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "alumni" => Ok(UserRole::Alumni),
            "admin" => Ok(UserRole::Admin),
            _ => Err(UnknownRole(code.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Ok(UserRole::Student));
        assert_eq!(UserRole::from_id(1), Ok(UserRole::Alumni));
        assert_eq!(UserRole::from_id(2), Ok(UserRole::Admin));
        assert!(UserRole::from_id(7).is_err());
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!("student".parse(), Ok(UserRole::Student));
        assert_eq!(" ALUMNI ".parse(), Ok(UserRole::Alumni));
        assert_eq!("admin".parse(), Ok(UserRole::Admin));
        assert!("moderator".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_id_and_code_roundtrip() {
        for role in [UserRole::Student, UserRole::Alumni, UserRole::Admin] {
            assert_eq!(UserRole::from_id(role.id()), Ok(role));
            assert_eq!(role.to_string().parse(), Ok(role));
        }
    }

    #[test]
    fn test_self_assignable() {
        assert!(UserRole::Student.is_self_assignable());
        assert!(UserRole::Alumni.is_self_assignable());
        assert!(!UserRole::Admin.is_self_assignable());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Alumni).unwrap(), "\"alumni\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
