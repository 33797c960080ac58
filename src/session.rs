//! In-memory per-session conversation history
//!
//! A session is a caller-supplied key mapping to an ordered list of turns.
//! Retention is a fixed-size sliding window: the newest [`MAX_HISTORY`]
//! entries are kept, oldest dropped first. Only the last [`CONTEXT_WINDOW`]
//! entries are ever sent upstream, so the retained window can grow later
//! without losing context already collected.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Maximum stored entries per session (5 exchanges)
pub const MAX_HISTORY: usize = 10;

/// Stored entries included as upstream context per request
pub const CONTEXT_WINDOW: usize = 3;

/// Session id used when the caller supplies none
pub const DEFAULT_SESSION_ID: &str = "default";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message unit
///
/// Serializes to the `{"role": ..., "content": ...}` shape the Ollama chat
/// endpoint expects, so stored history goes on the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Shared in-memory session map
///
/// Cloning is cheap and shares the underlying map. The read-modify-write
/// across a full chat exchange is not transactional; concurrent requests on
/// the same session id may interleave.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Vec<Turn>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full stored history for a session, empty if unseen
    pub async fn history(&self, session_id: &str) -> Vec<Turn> {
        self.inner
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The last [`CONTEXT_WINDOW`] stored entries for a session
    pub async fn recent(&self, session_id: &str) -> Vec<Turn> {
        let map = self.inner.read().await;
        let Some(turns) = map.get(session_id) else {
            return Vec::new();
        };
        let start = turns.len().saturating_sub(CONTEXT_WINDOW);
        turns[start..].to_vec()
    }

    /// Append one exchange, then truncate to the newest [`MAX_HISTORY`] entries
    pub async fn append(&self, session_id: &str, user: Turn, assistant: Turn) {
        let mut map = self.inner.write().await;
        let turns = map.entry(session_id.to_string()).or_default();
        turns.push(user);
        turns.push(assistant);
        if turns.len() > MAX_HISTORY {
            let excess = turns.len() - MAX_HISTORY;
            turns.drain(..excess);
        }
    }

    /// Delete a session's history; no-op if the session is unseen
    pub async fn reset(&self, session_id: &str) {
        self.inner.write().await.remove(session_id);
    }
}
