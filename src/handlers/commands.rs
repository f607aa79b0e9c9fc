//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to register a new member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMemberCommand {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl RegisterMemberCommand {
    pub fn new(full_name: String, email: String) -> Self {
        Self {
            full_name,
            email,
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = Some(phone);
        self
    }
}

/// Command to assign dues to a member for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDuesCommand {
    pub member_id: Uuid,
    /// Amount owed (as string for precise decimal)
    pub amount: String,
    /// Billing period, e.g. "2026-Q3"
    pub period: String,
}

impl AssignDuesCommand {
    pub fn new(member_id: Uuid, amount: String, period: String) -> Self {
        Self {
            member_id,
            amount,
            period,
        }
    }
}

/// Command to record a payment from a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentCommand {
    pub member_id: Uuid,
    /// Amount paid (as string for precise decimal)
    pub amount: String,
    /// Payment method, e.g. "bank_transfer"
    pub method: String,
    /// Optional memo
    pub memo: Option<String>,
}

impl RecordPaymentCommand {
    pub fn new(member_id: Uuid, amount: String, method: String) -> Self {
        Self {
            member_id,
            amount,
            method,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: String) -> Self {
        self.memo = Some(memo);
        self
    }
}

/// Result of a successful member registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMemberResult {
    pub member_id: Uuid,
    pub membership_number: String,
    pub status: String,
}

/// Result of a successful dues assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDuesResult {
    pub due_id: Uuid,
    pub member_id: Uuid,
    pub amount: Decimal,
    pub outstanding_balance: Decimal,
}

/// Result of a successful payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentResult {
    pub payment_id: Uuid,
    pub member_id: Uuid,
    pub amount: Decimal,
    pub outstanding_balance: Decimal,
}
