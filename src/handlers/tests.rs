//! Handler-level tests
//!
//! Database-free tests over commands and the validation rules the handlers
//! apply before persisting.

#[cfg(test)]
mod tests {
    use crate::domain::{Amount, DueStatus, MemberStatus, Role};
    use crate::handlers::{AssignDuesCommand, RecordPaymentCommand, RegisterMemberCommand};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_register_member_command_validation() {
        let cmd = RegisterMemberCommand::new(
            "Grace Hopper".to_string(),
            "grace@example.com".to_string(),
        );

        assert_eq!(cmd.full_name, "Grace Hopper");
        assert_eq!(cmd.email, "grace@example.com");
        assert!(cmd.phone.is_none());
    }

    #[test]
    fn test_assign_dues_amount_must_parse() {
        let cmd = AssignDuesCommand::new(Uuid::new_v4(), "150.00".to_string(), "2026".to_string());
        let amount: Result<Amount, _> = cmd.amount.parse();

        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(150.00));
    }

    #[test]
    fn test_dues_rejects_invalid_amounts() {
        let invalid_amounts = vec![
            "0",        // Zero is not allowed
            "-100",     // Negative not allowed
            "abc",      // Not a number
            "10.505",   // Sub-cent precision
            "1000001",  // Exceeds max
        ];

        for amount_str in invalid_amounts {
            let result: Result<Amount, _> = amount_str.parse();
            assert!(result.is_err(), "Expected error for amount: {}", amount_str);
        }
    }

    #[test]
    fn test_payment_amount_round_trips_decimal() {
        let cmd = RecordPaymentCommand::new(Uuid::new_v4(), "99.99".to_string(), "card".to_string());
        let amount: Amount = cmd.amount.parse().unwrap();

        assert_eq!(amount.value(), dec!(99.99));
    }

    #[test]
    fn test_new_members_start_as_prospects() {
        // Registration always begins the lifecycle at PROSPECT
        let status = MemberStatus::Prospect;
        assert!(status.can_transition_to(MemberStatus::Pending));
        assert!(!status.can_transition_to(MemberStatus::Suspended));
    }

    #[test]
    fn test_assigned_dues_start_unsettled() {
        assert!(DueStatus::Pending.is_unsettled());
    }

    #[test]
    fn test_admin_claims_resolve_for_write_paths() {
        // Write endpoints gate on the resolved role, never the raw claim
        assert_eq!(Role::resolve(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::resolve(Some("superuser")), Role::Guest);
    }
}
