//! API request and response types

use crate::db::{ChatLogEntry, SessionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Assistant reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

/// A named waypoint on the facility map
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub row: usize,
    pub col: usize,
}

/// Waypoint directory plus the grid (0 open, 1 blocked)
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationInfo>,
    pub grid: Vec<Vec<u8>>,
}

/// Stored session context
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionRecord,
}

/// Chat log for one session
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub entries: Vec<ChatLogEntry>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
