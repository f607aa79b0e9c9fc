//! Domain module
//!
//! Core domain types and business logic.

pub mod context;
pub mod error;
pub mod member;
pub mod money;
pub mod role;

pub use context::RequestContext;
pub use error::DomainError;
pub use member::{DueStatus, MemberStatus, MembershipNumber};
pub use money::{sum_amounts, Amount, AmountError, OutstandingBalance};
pub use role::Role;
