//! Conversation context types

use crate::navigation::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the conversation was last about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    #[default]
    None,
    Pathfinding,
}

/// Start and destination of the last successful route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPair {
    pub start: String,
    pub destination: String,
}

/// Dialogue mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueState {
    /// Ready for any request
    #[default]
    Idle,

    /// A continuation was accepted; the next utterance names a destination
    AwaitingDestination {
        /// Where the user currently is (previous destination)
        start: String,
    },
}

/// One completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub bot: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-session conversation context
///
/// Created empty on first contact; only `transition` mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConversationContext {
    #[serde(default)]
    pub last_topic: Topic,
    #[serde(default)]
    pub last_locations: Option<LocationPair>,
    #[serde(default)]
    pub state: DialogueState,
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl ConversationContext {
    pub fn awaiting_next_destination(&self) -> bool {
        matches!(self.state, DialogueState::AwaitingDestination { .. })
    }

    pub fn current_start_location(&self) -> Option<&str> {
        match &self.state {
            DialogueState::AwaitingDestination { start } => Some(start),
            DialogueState::Idle => None,
        }
    }

    /// Destination of the last route, if the conversation is about pathfinding
    pub fn continuation_point(&self) -> Option<&str> {
        match (self.last_topic, &self.last_locations) {
            (Topic::Pathfinding, Some(pair)) => Some(&pair.destination),
            _ => None,
        }
    }

    /// Record a successful route and return to `Idle`
    pub fn record_route(&mut self, route: &Route) {
        self.last_topic = Topic::Pathfinding;
        self.last_locations = Some(LocationPair {
            start: route.start.clone(),
            destination: route.destination.clone(),
        });
        self.state = DialogueState::Idle;
    }

    /// `last_topic == Pathfinding` implies both last locations are known, and
    /// awaiting a destination implies a start location (the latter holds by
    /// construction of `DialogueState`).
    pub fn is_consistent(&self) -> bool {
        let topic_ok = self.last_topic != Topic::Pathfinding || self.last_locations.is_some();
        let awaiting_ok = self.awaiting_next_destination() == self.current_start_location().is_some();
        topic_ok && awaiting_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Coord;

    #[test]
    fn test_default_is_idle_and_empty() {
        let ctx = ConversationContext::default();
        assert!(!ctx.awaiting_next_destination());
        assert_eq!(ctx.current_start_location(), None);
        assert_eq!(ctx.continuation_point(), None);
        assert!(ctx.history.is_empty());
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_record_route() {
        let mut ctx = ConversationContext {
            state: DialogueState::AwaitingDestination {
                start: "reception".to_string(),
            },
            ..Default::default()
        };
        ctx.record_route(&Route {
            start: "reception".to_string(),
            destination: "parking lot".to_string(),
            path: vec![Coord::new(0, 2)],
        });
        assert_eq!(ctx.last_topic, Topic::Pathfinding);
        assert_eq!(ctx.continuation_point(), Some("parking lot"));
        assert_eq!(ctx.state, DialogueState::Idle);
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_serde_shape() {
        let ctx = ConversationContext {
            state: DialogueState::AwaitingDestination {
                start: "reception".to_string(),
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["state"]["type"], "awaiting_destination");
        assert_eq!(json["state"]["start"], "reception");
        assert_eq!(json["last_topic"], "none");

        // Older rows without optional fields still load
        let loaded: ConversationContext = serde_json::from_str("{}").unwrap();
        assert_eq!(loaded, ConversationContext::default());
    }
}
