//! Database module for the facility assistant
//!
//! Persists per-session conversation contexts and the chat log.

mod schema;

pub use schema::*;

use crate::state_machine::{ConversationContext, Turn};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored context is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Database connection lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    /// Load a session's context, `None` if the session has never been stored
    pub fn get_context(&self, session_id: &str) -> DbResult<Option<ConversationContext>> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT context FROM sessions WHERE id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store the session's new context and append the turn to the chat log
    /// in one transaction
    pub fn commit_turn(
        &self,
        session_id: &str,
        context: &ConversationContext,
        turn: &Turn,
    ) -> DbResult<ChatLogEntry> {
        let json = serde_json::to_string(context)?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        upsert_context(&tx, session_id, &json)?;
        let entry = insert_chat_log(&tx, session_id, turn)?;
        tx.commit()?;
        Ok(entry)
    }

    /// Full session record for the debug view
    pub fn get_session(&self, session_id: &str) -> DbResult<SessionRecord> {
        let conn = self.conn()?;
        let (json, created_at, updated_at): (String, String, String) = conn
            .query_row(
                "SELECT context, created_at, updated_at FROM sessions WHERE id = ?1",
                params![session_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => DbError::SessionNotFound(session_id.to_string()),
                other => DbError::Sqlite(other),
            })?;

        Ok(SessionRecord {
            id: session_id.to_string(),
            context: serde_json::from_str(&json)?,
            created_at: parse_datetime(&created_at),
            updated_at: parse_datetime(&updated_at),
        })
    }

    // ==================== Chat Log Operations ====================

    /// Chat log rows for a session, oldest first
    pub fn get_chat_log(&self, session_id: &str) -> DbResult<Vec<ChatLogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, session_id, timestamp, user, bot FROM chat_logs
             WHERE session_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![session_id], |row| {
            Ok(ChatLogEntry {
                id: row.get(0)?,
                session_id: row.get(1)?,
                timestamp: parse_datetime(&row.get::<_, String>(2)?),
                user: row.get(3)?,
                bot: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }
}

fn upsert_context(conn: &Connection, session_id: &str, json: &str) -> DbResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions (id, context, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(id) DO UPDATE SET context = excluded.context, updated_at = excluded.updated_at",
        params![session_id, json, now],
    )?;
    Ok(())
}

fn insert_chat_log(conn: &Connection, session_id: &str, turn: &Turn) -> DbResult<ChatLogEntry> {
    conn.execute(
        "INSERT INTO chat_logs (session_id, timestamp, user, bot) VALUES (?1, ?2, ?3, ?4)",
        params![session_id, turn.timestamp.to_rfc3339(), turn.user, turn.bot],
    )?;

    Ok(ChatLogEntry {
        id: conn.last_insert_rowid(),
        session_id: session_id.to_string(),
        timestamp: turn.timestamp,
        user: turn.user.clone(),
        bot: turn.bot.clone(),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
