//! Events that drive the dialogue

use chrono::{DateTime, Utc};

/// Events that trigger context transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// An utterance from the user
    UserMessage {
        text: String,
        received_at: DateTime<Utc>,
    },

    /// The fallback collaborators answered (or all declined) for `text`
    CollaboratorReply {
        text: String,
        reply: Option<String>,
        received_at: DateTime<Utc>,
    },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage {
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}
