//! Database schema and types

use crate::state_machine::ConversationContext;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    context TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions(updated_at DESC);

CREATE TABLE IF NOT EXISTS chat_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    user TEXT NOT NULL,
    bot TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_logs_session ON chat_logs(session_id, id);
";

/// Stored conversation context for one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: String,
    pub context: ConversationContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One completed exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatLogEntry {
    pub id: i64,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub bot: String,
}
