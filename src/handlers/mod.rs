//! Command Handlers module
//!
//! Validate-then-persist write paths. Each handler validates its command,
//! persists the change, and reconciles the affected member's balance.

mod commands;
mod dues_handler;
mod payment_handler;
mod register_member_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use dues_handler::AssignDuesHandler;
pub use payment_handler::RecordPaymentHandler;
pub use register_member_handler::RegisterMemberHandler;
