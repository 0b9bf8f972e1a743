//! Effects produced by transitions

use super::Turn;
use chrono::{DateTime, Utc};

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the fallback chain (logic, knowledge base, FAQ, generative model)
    ConsultCollaborators { text: String },

    /// Store the new context and append the turn to the chat log together
    CommitTurn { turn: Turn },

    /// Send the reply to the user
    Reply {
        text: String,
        timestamp: DateTime<Utc>,
    },
}

impl Effect {
    pub fn reply(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Effect::Reply {
            text: text.into(),
            timestamp,
        }
    }
}
