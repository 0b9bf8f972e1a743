//! Pure dialogue transition function
//!
//! Given the same context, facility, and event it always produces the same
//! result, with no I/O. Rules are evaluated in priority order:
//! continuation, destination fulfilment, fresh route request, fallback.

use super::state::DialogueState;
use super::{ConversationContext, Effect, Event, Turn};
use crate::navigation::{Facility, NavigationError, Route};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Words that resume a previously offered route chain
pub const CONTINUATION_WORDS: &[&str] = &["yes", "continue", "more", "next"];

pub const CONTINUE_PROMPT: &str = "Would you like to continue from here? (Say 'yes' or 'continue')";

/// Used when every fallback collaborator declines
pub const DEFAULT_REPLY: &str = "I'm not sure about that one. I can help with recycling questions or directions, for example: 'path from cafeteria to reception'.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_context: ConversationContext,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(context: ConversationContext) -> Self {
        Self {
            new_context: context,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Reply text, if this transition completes the turn
    #[cfg(test)]
    pub fn reply(&self) -> Option<&str> {
        self.effects.iter().find_map(|e| match e {
            Effect::Reply { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Internal faults. User-facing navigation problems are replies, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Empty utterance")]
    EmptyUtterance,
    #[error("Session refers to waypoint '{0}' which is not on the facility map")]
    UnknownWaypoint(String),
}

/// Pure transition function
pub fn transition(
    context: &ConversationContext,
    facility: &Facility,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let result = match event {
        Event::UserMessage { text, received_at } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyUtterance);
            }
            handle_utterance(context, facility, text, received_at)?
        }

        Event::CollaboratorReply {
            text,
            reply,
            received_at,
        } => {
            let reply = reply
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REPLY.to_string());
            complete_turn(context.clone(), &text, &reply, received_at)
        }
    };

    debug_assert!(
        result.new_context.is_consistent(),
        "inconsistent context after transition: {:?}",
        result.new_context
    );
    Ok(result)
}

fn handle_utterance(
    context: &ConversationContext,
    facility: &Facility,
    text: &str,
    at: DateTime<Utc>,
) -> Result<TransitionResult, TransitionError> {
    // 1. Continuation trigger
    if has_continuation_word(text) {
        if let Some(destination) = context.continuation_point() {
            let mut next = context.clone();
            next.state = DialogueState::AwaitingDestination {
                start: destination.to_string(),
            };
            let reply = format!(
                "Great! You're currently at {destination}. Where would you like to go next?"
            );
            return Ok(complete_turn(next, text, &reply, at));
        }
    }

    // 2. Destination fulfilment
    if let Some(start) = context.current_start_location() {
        let start_wp = facility
            .waypoint(start)
            .ok_or_else(|| TransitionError::UnknownWaypoint(start.to_string()))?;

        let Some(destination) = facility.resolve(text) else {
            let err = NavigationError::AwaitingDestinationUnresolved {
                phrase: text.to_string(),
                options: facility.valid_options(),
            };
            return Ok(complete_turn(context.clone(), text, &err.to_string(), at));
        };

        return Ok(match facility.route(start_wp, destination) {
            Ok(route) => route_found(context, facility, &route, text, at),
            // Dead end: stay put so the user can pick another destination
            Err(err) => complete_turn(context.clone(), text, &err.to_string(), at),
        });
    }

    // 3. Fresh pathfinding request
    if facility.is_path_request(text) {
        return Ok(match facility.plan(text) {
            Ok(route) => route_found(context, facility, &route, text, at),
            Err(err) => {
                tracing::debug!(error = ?err, "Pathfinding request not fulfilled");
                complete_turn(context.clone(), text, &err.to_string(), at)
            }
        });
    }

    // 4. Fallback to collaborators; context untouched until they answer
    Ok(
        TransitionResult::new(context.clone()).with_effect(Effect::ConsultCollaborators {
            text: text.to_string(),
        }),
    )
}

fn route_found(
    context: &ConversationContext,
    facility: &Facility,
    route: &Route,
    text: &str,
    at: DateTime<Utc>,
) -> TransitionResult {
    let mut next = context.clone();
    next.record_route(route);
    let reply = format!("{}\n\n{CONTINUE_PROMPT}", facility.render(route));
    complete_turn(next, text, &reply, at)
}

/// Append the turn to history and emit the commit and reply effects
fn complete_turn(
    mut context: ConversationContext,
    user: &str,
    bot: &str,
    at: DateTime<Utc>,
) -> TransitionResult {
    let turn = Turn {
        user: user.to_string(),
        bot: bot.to_string(),
        timestamp: at,
    };
    context.history.push(turn.clone());

    TransitionResult::new(context)
        .with_effects([Effect::CommitTurn { turn }, Effect::reply(bot, at)])
}

/// Whole-word match against the continuation vocabulary
pub fn has_continuation_word(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| CONTINUATION_WORDS.contains(&word))
}
