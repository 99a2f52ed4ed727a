//! User records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a user record
///
/// Serialized as a bare JSON number. New ids are derived from the creation
/// timestamp in milliseconds, so they are roughly increasing but not dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw id
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw numeric value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Fixed set of roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Regular member (the form default)
    #[default]
    User,
    /// Team manager
    Manager,
    /// Administrator
    Admin,
}

/// Display classification for a role badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Red,
    Blue,
    Green,
}

impl Role {
    /// All roles in selector order
    pub const ALL: [Role; 3] = [Role::User, Role::Manager, Role::Admin];

    /// Canonical name, as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    /// Badge colour used when listing users
    pub fn badge(&self) -> BadgeColor {
        match self {
            Self::Admin => BadgeColor::Red,
            Self::Manager => BadgeColor::Blue,
            Self::User => BadgeColor::Green,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known role
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected User, Manager or Admin)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Parse a role name, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(trimmed.to_string()))
    }
}

/// A user record in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: String,
}

impl User {
    /// Whether `needle` (already lowercased) occurs in name, email or role
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.role.as_str().to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" MANAGER ".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("User".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let err = "superadmin".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("superadmin".to_string()));
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_badges() {
        assert_eq!(Role::Admin.badge(), BadgeColor::Red);
        assert_eq!(Role::Manager.badge(), BadgeColor::Blue);
        assert_eq!(Role::User.badge(), BadgeColor::Green);
    }

    #[test]
    fn test_user_json_layout() {
        let user = User {
            id: UserId::new(1712345678901),
            name: "Ann Lee".to_string(),
            email: "ann@x.com".to_string(),
            role: Role::Manager,
            avatar: "https://example.com/a.png".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1712345678901i64,
                "name": "Ann Lee",
                "email": "ann@x.com",
                "role": "Manager",
                "avatar": "https://example.com/a.png"
            })
        );
    }

    #[test]
    fn test_user_id_from_str() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId::new(42));
        assert!("forty-two".parse::<UserId>().is_err());
    }
}
