//! Per-session persistence — the store collaborator.
//!
//! The wizard needs exactly three operations keyed by session identity, with
//! no cross-session visibility. A session issues requests sequentially, so
//! last-write-wins semantics are acceptable; the in-memory backend provides
//! exactly that.

mod memory;

pub use memory::MemorySessionStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::wizard::BusinessProfile;

/// Everything persisted for one session: the wizard profile plus the
/// authentication flag, which deliberately survives profile resets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub profile: BusinessProfile,
}

impl SessionState {
    /// Start-fresh contract: wipe the profile, keep the auth flag.
    pub fn reset_profile(&mut self) {
        self.profile.reset();
    }
}

/// Backend-agnostic session store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the state for a session, if any.
    async fn get(&self, session_id: &str) -> Result<Option<SessionState>, SessionError>;

    /// Store (or replace) the state for a session.
    async fn put(&self, session_id: &str, state: SessionState) -> Result<(), SessionError>;

    /// Drop a session entirely.
    async fn clear(&self, session_id: &str) -> Result<(), SessionError>;
}
