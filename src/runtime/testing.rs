//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::collaborators::Responder;
use crate::state_machine::{ConversationContext, Turn};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Responder
// ============================================================================

/// Responder with a fixed answer that records what it was asked
pub struct MockResponder {
    name: String,
    reply: Option<String>,
    /// Record of all utterances received
    pub calls: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn replying(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: Some(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always passes
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for MockResponder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        self.calls.lock().unwrap().push(utterance.to_string());
        self.reply.clone()
    }
}

// ============================================================================
// In-Memory Storage
// ============================================================================

/// A logged exchange
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedChat {
    pub session_id: String,
    pub user: String,
    pub bot: String,
    pub timestamp: DateTime<Utc>,
}

/// In-memory session store and chat log
#[derive(Default)]
pub struct InMemoryStorage {
    contexts: Mutex<HashMap<String, ConversationContext>>,
    chats: Mutex<Vec<LoggedChat>>,
    fail_writes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Seed a context directly
    pub fn insert_context(&self, session_id: &str, context: ConversationContext) {
        self.contexts
            .lock()
            .unwrap()
            .insert(session_id.to_string(), context);
    }

    pub fn context(&self, session_id: &str) -> Option<ConversationContext> {
        self.contexts.lock().unwrap().get(session_id).cloned()
    }

    pub fn chats(&self, session_id: &str) -> Vec<LoggedChat> {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect()
    }

    fn check_writable(&self) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err("storage unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn load_context(&self, session_id: &str) -> Result<Option<ConversationContext>, String> {
        Ok(self.context(session_id))
    }

    async fn commit_turn(
        &self,
        session_id: &str,
        context: &ConversationContext,
        turn: &Turn,
    ) -> Result<(), String> {
        self.check_writable()?;
        self.insert_context(session_id, context.clone());
        self.chats.lock().unwrap().push(LoggedChat {
            session_id: session_id.to_string(),
            user: turn.user.clone(),
            bot: turn.bot.clone(),
            timestamp: turn.timestamp,
        });
        Ok(())
    }
}
