//! Member lifecycle types
//!
//! Statuses for members and assigned dues, plus membership number
//! generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a member record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Prospect,
    Pending,
    Active,
    Suspended,
}

impl MemberStatus {
    /// Database column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospect => "PROSPECT",
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }

    /// Whether a transition to `next` is allowed.
    ///
    /// Prospects are promoted to pending, pending to active; active and
    /// suspended members toggle between those two states.
    pub fn can_transition_to(&self, next: MemberStatus) -> bool {
        matches!(
            (self, next),
            (Self::Prospect, Self::Pending)
                | (Self::Pending, Self::Active)
                | (Self::Active, Self::Suspended)
                | (Self::Suspended, Self::Active)
        )
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROSPECT" => Ok(Self::Prospect),
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            other => Err(super::DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Settlement status of an assigned due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueStatus {
    Pending,
    Partial,
    Paid,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
        }
    }

    /// Unsettled dues (pending or partial) count toward the outstanding
    /// balance; paid dues do not.
    pub fn is_unsettled(&self) -> bool {
        matches!(self, Self::Pending | Self::Partial)
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DueStatus {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PARTIAL" => Ok(Self::Partial),
            "PAID" => Ok(Self::Paid),
            other => Err(super::DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Human-facing membership identifier, e.g. `MBR-2026-00042`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipNumber(String);

impl MembershipNumber {
    /// Generate the membership number for the `sequence`-th member
    /// registered in `year`.
    pub fn generate(year: i32, sequence: u32) -> Self {
        Self(format!("MBR-{}-{:05}", year, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MembershipNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MembershipNumber> for String {
    fn from(n: MembershipNumber) -> Self {
        n.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_status_round_trip() {
        for status in [
            MemberStatus::Prospect,
            MemberStatus::Pending,
            MemberStatus::Active,
            MemberStatus::Suspended,
        ] {
            let parsed: MemberStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_member_status_invalid() {
        let result: Result<MemberStatus, _> = "DELETED".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_member_status_transitions() {
        assert!(MemberStatus::Prospect.can_transition_to(MemberStatus::Pending));
        assert!(MemberStatus::Pending.can_transition_to(MemberStatus::Active));
        assert!(MemberStatus::Active.can_transition_to(MemberStatus::Suspended));
        assert!(MemberStatus::Suspended.can_transition_to(MemberStatus::Active));

        assert!(!MemberStatus::Prospect.can_transition_to(MemberStatus::Active));
        assert!(!MemberStatus::Suspended.can_transition_to(MemberStatus::Prospect));
    }

    #[test]
    fn test_due_status_unsettled() {
        assert!(DueStatus::Pending.is_unsettled());
        assert!(DueStatus::Partial.is_unsettled());
        assert!(!DueStatus::Paid.is_unsettled());
    }

    #[test]
    fn test_membership_number_format() {
        let number = MembershipNumber::generate(2026, 42);
        assert_eq!(number.as_str(), "MBR-2026-00042");
    }

    #[test]
    fn test_membership_number_wide_sequence() {
        let number = MembershipNumber::generate(2026, 123456);
        assert_eq!(number.as_str(), "MBR-2026-123456");
    }
}
