//! Login sessions held in the shared store.
//!
//! A session is a single key, `sess:<id>`, whose value is the username and
//! whose TTL is the session lifetime. Sessions are never updated.

use std::time::Duration;

use rand::{rngs::OsRng, RngCore};
use tracing::{debug, info};

use crate::kv::SharedKv;

use super::error::{AuthError, AuthResult};

/// Prefix of session keys.
pub const SESSION_KEY_PREFIX: &str = "sess";

/// Session ids carry 128 bits of randomness.
const SESSION_ID_BYTES: usize = 16;

/// Issues and resolves login sessions.
#[derive(Clone)]
pub struct SessionStore {
    kv: SharedKv,
    ttl: Duration,
}

impl SessionStore {
    pub const fn new(kv: SharedKv, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates a session for `username` and returns its id.
    ///
    /// # Errors
    /// `AuthError::Store` if the session could not be persisted; no id is
    /// handed out in that case.
    #[tracing::instrument(skip(self))]
    pub async fn issue(&self, username: &str) -> AuthResult<String> {
        let session_id = generate_session_id();
        self.kv
            .set(&session_key(&session_id), username, Some(self.ttl))
            .await?;

        info!(ttl_secs = self.ttl.as_secs(), "Session issued");
        Ok(session_id)
    }

    /// Returns the username owning `session_id`.
    ///
    /// # Errors
    /// `AuthError::Unauthorized` for unknown, expired or empty sessions,
    /// `AuthError::Store` if the lookup itself failed.
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self, session_id: &str) -> AuthResult<String> {
        if session_id.is_empty() {
            return Err(AuthError::Unauthorized);
        }

        match self.kv.get(&session_key(session_id)).await? {
            Some(username) if !username.is_empty() => Ok(username),
            _ => {
                debug!("Session not found");
                Err(AuthError::Unauthorized)
            }
        }
    }
}

/// Builds the store key for a session id.
pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}:{session_id}")
}

/// Generates a session id: 16 bytes from the OS RNG as lowercase hex.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kv::{KvStore, MemoryStore};

    fn store(kv: &MemoryStore) -> SessionStore {
        SessionStore::new(Arc::new(kv.clone()), Duration::from_secs(24 * 60 * 60))
    }

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_ne!(id, generate_session_id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_issue_then_resolve_until_expiry() {
        let kv = MemoryStore::new();
        let sessions = store(&kv);

        let id = sessions.issue("alice").await.unwrap();
        assert_eq!(kv.keys(), vec![session_key(&id)]);
        assert_eq!(kv.ttl(&session_key(&id)), Some(sessions.ttl()));
        assert_eq!(sessions.resolve(&id).await.unwrap(), "alice");

        tokio::time::advance(Duration::from_secs(24 * 60 * 60 - 1)).await;
        assert_eq!(sessions.resolve(&id).await.unwrap(), "alice");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(matches!(
            sessions.resolve(&id).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_same_user_gets_distinct_sessions() {
        let kv = MemoryStore::new();
        let sessions = store(&kv);

        let first = sessions.issue("bob").await.unwrap();
        let second = sessions.issue("bob").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(sessions.resolve(&first).await.unwrap(), "bob");
        assert_eq!(sessions.resolve(&second).await.unwrap(), "bob");
    }

    #[tokio::test]
    async fn test_unknown_and_empty_sessions_are_unauthorized() {
        let kv = MemoryStore::new();
        let sessions = store(&kv);
        kv.set(&session_key("blank"), "", None).await.unwrap();

        for id in ["deadbeef", "", "blank"] {
            assert!(matches!(
                sessions.resolve(id).await,
                Err(AuthError::Unauthorized)
            ));
        }
    }
}
