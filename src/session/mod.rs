//! Session management
//!
//! In-memory session store mapping bearer tokens to authenticated
//! identities. Tokens are random and stored hashed; entries expire after a
//! configurable TTL. Resolution of an unknown, malformed, or expired token
//! yields `None`, which callers treat as an unauthenticated request.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Role;

/// Session token handed to the client
pub type SessionToken = String;

/// Identity claims carried by a live session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub subject_id: Uuid,
    pub role: Role,
}

/// A stored session
#[derive(Debug, Clone)]
struct Session {
    subject_id: Uuid,
    role: Role,
    created_at: DateTime<Utc>,
}

/// In-memory session store keyed by token hash
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl_hours`
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Create a new session for an authenticated subject, returning the
    /// bearer token. Only the token's hash is retained.
    pub async fn create(&self, subject_id: Uuid, role: Role) -> SessionToken {
        let token = generate_token();
        let session = Session {
            subject_id,
            role,
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(hash_token(&token), session);
        token
    }

    /// Resolve a token to its claims, if the session exists and is live
    pub async fn resolve(&self, token: &str) -> Option<SessionClaims> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&hash_token(token))?;

        if Utc::now().signed_duration_since(session.created_at) >= self.ttl {
            return None;
        }

        Some(SessionClaims {
            subject_id: session.subject_id,
            role: session.role,
        })
    }

    /// Delete a session (logout). Unknown tokens are a no-op.
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&hash_token(token));
    }

    /// Drop expired sessions, returning how many were removed
    pub async fn prune_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let before = sessions.len();

        sessions.retain(|_, session| now.signed_duration_since(session.created_at) < self.ttl);

        before - sessions.len()
    }

    #[cfg(test)]
    async fn insert_aged(&self, token: &str, subject_id: Uuid, role: Role, age_hours: i64) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            hash_token(token),
            Session {
                subject_id,
                role,
                created_at: Utc::now() - Duration::hours(age_hours),
            },
        );
    }
}

/// Random 128-bit token, hex encoded
fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Tokens are stored hashed so a leaked store dump cannot be replayed
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a portal user's password for comparison against the stored hash
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let store = SessionStore::new(24);
        let subject_id = Uuid::new_v4();

        let token = store.create(subject_id, Role::Member).await;
        assert!(!token.is_empty());

        let claims = store.resolve(&token).await;
        assert_eq!(
            claims,
            Some(SessionClaims {
                subject_id,
                role: Role::Member
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let store = SessionStore::new(24);
        assert!(store.resolve("deadbeef").await.is_none());
        assert!(store.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_resolves_to_none() {
        let store = SessionStore::new(24);
        store
            .insert_aged("stale", Uuid::new_v4(), Role::Admin, 25)
            .await;

        assert!(store.resolve("stale").await.is_none());
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = SessionStore::new(24);
        let token = store.create(Uuid::new_v4(), Role::Admin).await;

        store.revoke(&token).await;
        assert!(store.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let store = SessionStore::new(24);
        let live = store.create(Uuid::new_v4(), Role::Member).await;
        store
            .insert_aged("stale", Uuid::new_v4(), Role::Member, 30)
            .await;

        let pruned = store.prune_expired().await;
        assert_eq!(pruned, 1);
        assert!(store.resolve(&live).await.is_some());
    }

    #[test]
    fn test_password_hash_is_stable() {
        let hash1 = hash_password("hunter2");
        let hash2 = hash_password("hunter2");
        assert_eq!(hash1, hash2);

        let hash3 = hash_password("other");
        assert_ne!(hash1, hash3);
    }
}
