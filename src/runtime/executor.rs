//! Single-turn executor: feeds events through the state machine and runs effects

use super::traits::Storage;
use super::{ChatReply, RuntimeError};
use crate::collaborators::Responder;
use crate::navigation::Facility;
use crate::state_machine::{transition, ConversationContext, Effect, Event};
use chrono::Utc;

/// Runs one user turn for one session against the stored context
pub struct TurnExecutor<'a, S: Storage + ?Sized> {
    session_id: &'a str,
    context: ConversationContext,
    storage: &'a S,
    facility: &'a Facility,
    responder: &'a dyn Responder,
    reply: Option<ChatReply>,
}

impl<'a, S: Storage + ?Sized> TurnExecutor<'a, S> {
    pub fn new(
        session_id: &'a str,
        context: ConversationContext,
        storage: &'a S,
        facility: &'a Facility,
        responder: &'a dyn Responder,
    ) -> Self {
        Self {
            session_id,
            context,
            storage,
            facility,
            responder,
            reply: None,
        }
    }

    /// Process the event and every event its effects generate
    pub async fn run(mut self, event: Event) -> Result<ChatReply, RuntimeError> {
        // Process events in a loop - no recursion
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let result = transition(&self.context, self.facility, current_event)?;
            self.context = result.new_context;

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await? {
                    events_to_process.push(generated_event);
                }
            }
        }

        self.reply.ok_or(RuntimeError::NoReply)
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<Option<Event>, RuntimeError> {
        match effect {
            Effect::ConsultCollaborators { text } => {
                let reply = self.responder.respond(&text).await;
                if reply.is_none() {
                    tracing::debug!(session_id = %self.session_id, "No collaborator answered");
                }
                Ok(Some(Event::CollaboratorReply {
                    text,
                    reply,
                    received_at: Utc::now(),
                }))
            }

            Effect::CommitTurn { turn } => {
                self.storage
                    .commit_turn(self.session_id, &self.context, &turn)
                    .await
                    .map_err(RuntimeError::Storage)?;
                Ok(None)
            }

            Effect::Reply { text, timestamp } => {
                self.reply = Some(ChatReply { text, timestamp });
                Ok(None)
            }
        }
    }
}
