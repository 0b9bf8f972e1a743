//! Runtime for executing conversations
//!
//! Owns the shared facility and collaborator chain, and serialises each
//! session's load-transition-store cycle behind a per-session lock. A lock
//! lives only while a turn for its session is running or queued.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::TurnExecutor;
pub use traits::*;

use crate::collaborators::Responder;
use crate::navigation::Facility;
use crate::state_machine::{Event, TransitionError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Type alias for the production runtime backed by SQLite
pub type ProductionRuntime = RuntimeManager<DatabaseStorage>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Turn completed without a reply")]
    NoReply,
}

/// The assistant's answer to one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Manager for all conversation sessions
pub struct RuntimeManager<S: Storage> {
    facility: Arc<Facility>,
    storage: S,
    responder: Arc<dyn Responder>,
    sessions: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: Storage> RuntimeManager<S> {
    pub fn new(facility: Arc<Facility>, storage: S, responder: Arc<dyn Responder>) -> Self {
        Self {
            facility,
            storage,
            responder,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn facility(&self) -> &Arc<Facility> {
        &self.facility
    }

    /// Sessions with a turn running or queued
    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.sessions.read().await.get(session_id) {
            return lock.clone();
        }
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the session's lock once no other turn holds or waits on it
    async fn release_session_lock(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        let mut sessions = self.sessions.write().await;
        // Clones are only taken under the map lock: the map and this turn hold the rest
        if Arc::strong_count(&lock) == 2 {
            sessions.remove(session_id);
        }
    }

    /// Handle one utterance for a session and return the reply
    pub async fn handle_message(&self, session_id: &str, text: &str) -> Result<ChatReply, RuntimeError> {
        let lock = self.session_lock(session_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_turn(session_id, text).await
        };
        self.release_session_lock(session_id, lock).await;
        result
    }

    async fn run_turn(&self, session_id: &str, text: &str) -> Result<ChatReply, RuntimeError> {
        let start = std::time::Instant::now();
        let context = self
            .storage
            .load_context(session_id)
            .await
            .map_err(RuntimeError::Storage)?
            .unwrap_or_default();

        let result = TurnExecutor::new(
            session_id,
            context,
            &self.storage,
            &self.facility,
            self.responder.as_ref(),
        )
        .run(Event::user_message(text))
        .await;

        match &result {
            Ok(_) => tracing::info!(
                session_id = %session_id,
                duration_ms = %start.elapsed().as_millis(),
                "Turn completed"
            ),
            Err(e) => tracing::error!(session_id = %session_id, error = %e, "Turn failed"),
        }

        result
    }
}
