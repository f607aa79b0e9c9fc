//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule violations and domain invariant failures, independent of
/// the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid amount (zero, negative, or exceeds limit)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Unknown member or due status string
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Status transition not allowed for the member lifecycle
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalStatusTransition { from: String, to: String },

    /// Member not found
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Unauthorized operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    /// Create an illegal transition error
    pub fn illegal_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IllegalStatusTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidStatus(_)
                | Self::IllegalStatusTransition { .. }
                | Self::Unauthorized(_)
        )
    }
}

impl From<super::AmountError> for DomainError {
    fn from(err: super::AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_error() {
        let err = DomainError::illegal_transition("PROSPECT", "SUSPENDED");

        assert!(err.is_client_error());
        assert!(err.to_string().contains("PROSPECT"));
        assert!(err.to_string().contains("SUSPENDED"));
    }

    #[test]
    fn test_member_not_found_is_not_client_error() {
        let err = DomainError::MemberNotFound("abc".to_string());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_amount_error_conversion() {
        let amount_err = super::super::AmountError::Overflow;
        let err: DomainError = amount_err.into();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
    }
}
