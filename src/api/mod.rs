//! API module
//!
//! HTTP endpoints, page routes, and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use sqlx::PgPool;

use crate::session::SessionStore;

pub use routes::{api_router, auth_router, page_router};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pool: PgPool, sessions: Arc<SessionStore>) -> Self {
        Self { pool, sessions }
    }
}
