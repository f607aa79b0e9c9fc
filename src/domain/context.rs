//! Request Context
//!
//! Session and tracing metadata for the current request, passed explicitly
//! into handlers rather than held as ambient state.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

use super::Role;

/// Context for a request, carrying the resolved identity and tracing ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Authenticated subject (portal user id), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<Uuid>,

    /// Effective role for this request
    pub role: Role,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,

    /// Client IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl RequestContext {
    /// Create an unauthenticated context
    pub fn new() -> Self {
        Self {
            subject_id: None,
            role: Role::Guest,
            correlation_id: None,
            client_ip: None,
        }
    }

    /// Attach an authenticated subject and role
    pub fn with_subject(mut self, subject_id: Uuid, role: Role) -> Self {
        self.subject_id = Some(subject_id);
        self.role = role;
        self
    }

    /// Attach a correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Attach the client IP
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_guest() {
        let context = RequestContext::new();
        assert_eq!(context.role, Role::Guest);
        assert!(context.subject_id.is_none());
    }

    #[test]
    fn test_context_builder() {
        let subject_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let context = RequestContext::new()
            .with_subject(subject_id, Role::Member)
            .with_correlation_id(correlation_id);

        assert_eq!(context.subject_id, Some(subject_id));
        assert_eq!(context.role, Role::Member);
        assert_eq!(context.correlation_id, Some(correlation_id));
    }

    #[test]
    fn test_ensure_correlation_id() {
        let mut context = RequestContext::new();
        assert!(context.correlation_id.is_none());

        let id = context.ensure_correlation_id();
        assert_eq!(context.correlation_id, Some(id));

        let id2 = context.ensure_correlation_id();
        assert_eq!(id, id2);
    }
}
