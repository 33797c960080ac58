//! Chat orchestration
//!
//! Ties the pieces together for one exchange: validate input, assemble the
//! prompt from the active personality and recent history, call the
//! generation backend, record the exchange, customize the reply.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::customize::{self, ResponseConfig};
use crate::generation::{Degradation, Generator, Outcome};
use crate::session::{DEFAULT_SESSION_ID, SessionStore, Turn};
use crate::{Error, Result};

/// Outcome of one chat exchange
#[derive(Debug)]
pub struct ChatReply {
    /// Customized text to return to the caller
    pub text: String,
    /// Session id the exchange was recorded under
    pub session_id: String,
    /// Set when generation degraded to a canned reply
    pub degradation: Option<Degradation>,
}

/// Per-request chat pipeline over shared state
///
/// Stateless across requests except through the session store. Cloning
/// shares the store, config, and generation backend.
#[derive(Clone)]
pub struct ChatEngine {
    generator: Arc<dyn Generator>,
    store: SessionStore,
    config: Arc<RwLock<ResponseConfig>>,
}

impl ChatEngine {
    #[must_use]
    pub fn new(
        generator: Arc<dyn Generator>,
        store: SessionStore,
        config: Arc<RwLock<ResponseConfig>>,
    ) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    /// Handle one user message
    ///
    /// Generation failures degrade to canned text and still produce `Ok`;
    /// only structurally invalid input is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] if the message is empty after trimming.
    pub async fn handle(&self, message: &str, session_id: Option<&str>) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let session_id = session_id
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID);

        // Snapshot the config once so one exchange sees one consistent view
        let config = self.config.read().await.clone();
        let system_prompt = config.active_personality().system_prompt();

        let mut turns = vec![Turn::system(system_prompt)];
        if config.add_context {
            turns.extend(self.store.recent(session_id).await);
        }
        turns.push(Turn::user(message));

        let outcome = self.generator.generate(&turns).await;
        let (raw, degradation) = match outcome {
            Outcome::Reply(text) => (text, None),
            Outcome::Degraded(reason) => {
                tracing::warn!(session_id, ?reason, "generation degraded to canned reply");
                (reason.user_text().to_string(), Some(reason))
            }
        };

        // An empty 200 reply is still an exchange the upstream took part in,
        // so it is recorded and customized like a real one. Transport-level
        // degradations return their canned text literally and leave history
        // untouched.
        let upstream_answered = matches!(degradation, None | Some(Degradation::EmptyReply));
        if upstream_answered {
            self.store
                .append(session_id, Turn::user(message), Turn::assistant(&raw))
                .await;
        }

        let text = if upstream_answered {
            customize::customize(&raw, &config)
        } else {
            raw
        };

        Ok(ChatReply {
            text,
            session_id: session_id.to_string(),
            degradation,
        })
    }

    /// Clear a session's history; defaults the session id like `handle`
    pub async fn reset(&self, session_id: Option<&str>) {
        let session_id = session_id
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID);
        self.store.reset(session_id).await;
    }

    /// The shared session store backing this engine
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
