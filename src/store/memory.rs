//! In-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{SessionState, SessionStore};
use crate::error::SessionError;

/// Session store backed by a map behind an async lock.
///
/// Writes replace the whole state for a session (last write wins). Lives for
/// the process lifetime; nothing survives a restart, which matches the
/// wizard's no-cross-session-persistence contract.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, SessionError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session_id: &str, state: SessionState) -> Result<(), SessionError> {
        debug!(session_id, "Storing session state");
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), state);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        debug!(session_id, "Clearing session");
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
