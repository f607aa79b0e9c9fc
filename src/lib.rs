//! memberPortal Library
//!
//! Re-exports modules for integration testing and external use.

pub mod access;
pub mod api;
pub mod domain;
pub mod handlers;
pub mod jobs;
pub mod reconcile;
pub mod session;

// Private modules (used only by main.rs binary)
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use access::{authorize, AccessDecision};
pub use domain::{Amount, AmountError, DomainError, OutstandingBalance, RequestContext, Role};
pub use reconcile::{MemberLedger, PgMemberLedger, ReconcileReport, ReconcileService};
pub use session::SessionStore;
