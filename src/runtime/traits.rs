//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::db::Database;
use crate::state_machine::{ConversationContext, Turn};
use async_trait::async_trait;
use std::sync::Arc;

/// Per-session contexts plus the append-only chat log
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the context, `None` for a session never seen before
    async fn load_context(&self, session_id: &str) -> Result<Option<ConversationContext>, String>;

    /// Replace the stored context and log the completed turn as one unit.
    /// On error neither write is visible.
    async fn commit_turn(
        &self,
        session_id: &str,
        context: &ConversationContext,
        turn: &Turn,
    ) -> Result<(), String>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn load_context(&self, session_id: &str) -> Result<Option<ConversationContext>, String> {
        (**self).load_context(session_id).await
    }

    async fn commit_turn(
        &self,
        session_id: &str,
        context: &ConversationContext,
        turn: &Turn,
    ) -> Result<(), String> {
        (**self).commit_turn(session_id, context, turn).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use Database as Storage
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn load_context(&self, session_id: &str) -> Result<Option<ConversationContext>, String> {
        self.db.get_context(session_id).map_err(|e| e.to_string())
    }

    async fn commit_turn(
        &self,
        session_id: &str,
        context: &ConversationContext,
        turn: &Turn,
    ) -> Result<(), String> {
        self.db
            .commit_turn(session_id, context, turn)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
