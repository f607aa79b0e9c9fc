//! Role resolution
//!
//! Coarse authorization levels derived from session claims.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization level for a request.
///
/// Exactly three values; anything a session cannot vouch for is `Guest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    Guest,
}

impl Role {
    /// Resolve an effective role from an optional session role claim.
    ///
    /// Absent, malformed, or unknown claims all map to `Guest` - the
    /// fail-closed default. This never errors.
    pub fn resolve(claim: Option<&str>) -> Role {
        match claim {
            Some("ADMIN") => Role::Admin,
            Some("MEMBER") => Role::Member,
            _ => Role::Guest,
        }
    }

    /// Database / token representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Guest => "GUEST",
        }
    }

    /// Whether this role carries any authenticated identity
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Guest)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absent_is_guest() {
        assert_eq!(Role::resolve(None), Role::Guest);
    }

    #[test]
    fn test_resolve_known_roles() {
        assert_eq!(Role::resolve(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::resolve(Some("MEMBER")), Role::Member);
    }

    #[test]
    fn test_resolve_unknown_is_guest() {
        assert_eq!(Role::resolve(Some("WHATEVER")), Role::Guest);
        assert_eq!(Role::resolve(Some("admin")), Role::Guest);
        assert_eq!(Role::resolve(Some("")), Role::Guest);
    }

    #[test]
    fn test_is_authenticated() {
        assert!(Role::Admin.is_authenticated());
        assert!(Role::Member.is_authenticated());
        assert!(!Role::Guest.is_authenticated());
    }
}
