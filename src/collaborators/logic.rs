//! Rule-based logic handler
//!
//! Answers greetings, the location directory, and yes/no questions about how
//! facility areas connect, using the knowledge base.

use super::knowledge::{normalize, KnowledgeBase};
use super::Responder;
use crate::navigation::Facility;
use async_trait::async_trait;
use std::sync::Arc;

pub const GREETING_REPLY: &str = "Hello! How can I help you today?";

const GREETINGS: &[&str] = &["hi", "hello", "hey"];
const LIST_VERBS: &[&str] = &["list", "show"];
const LIST_NOUNS: &[&str] = &["locations", "places", "waypoints"];

pub struct LogicEngine {
    knowledge: Arc<KnowledgeBase>,
    facility: Arc<Facility>,
}

impl LogicEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>, facility: Arc<Facility>) -> Self {
        Self { knowledge, facility }
    }

    /// Evaluate a query; `None` when the handler has nothing to say
    pub fn handle(&self, utterance: &str) -> Option<String> {
        let query = normalize(utterance.trim_end_matches(['?', '!', '.']));
        if query.is_empty() {
            return None;
        }

        if is_greeting(&query) {
            return Some(GREETING_REPLY.to_string());
        }

        if is_directory_request(&query) {
            return Some(self.directory());
        }

        let statement = as_statement(&query);
        if self.knowledge.holds(&statement) {
            return Some(format!("✅ Yes, it's true that {statement}."));
        }
        if let Some(rule) = self.knowledge.infer(&statement) {
            return Some(format!("🧠 Inferred: {} based on known connections.", rule.conclusion));
        }

        None
    }

    fn directory(&self) -> String {
        let lines: Vec<String> = self
            .facility
            .waypoints()
            .iter()
            .map(|w| format!("• {} {}", w.name(), w.coord()))
            .collect();
        format!("📍 Available locations:\n{}", lines.join("\n"))
    }
}

#[async_trait]
impl Responder for LogicEngine {
    fn name(&self) -> &str {
        "logic"
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        self.handle(utterance)
    }
}

/// A greeting word, optionally followed by "there"
fn is_greeting(query: &str) -> bool {
    let query = query.trim_end_matches(',');
    let word = query.strip_suffix(" there").unwrap_or(query);
    GREETINGS.contains(&word)
}

/// "list locations", "show all places", ...
fn is_directory_request(query: &str) -> bool {
    let words: Vec<&str> = query.split(' ').collect();
    match words.as_slice() {
        [verb, noun] => LIST_VERBS.contains(verb) && LIST_NOUNS.contains(noun),
        [verb, "all" | "the", noun] => LIST_VERBS.contains(verb) && LIST_NOUNS.contains(noun),
        _ => false,
    }
}

/// Rewrite yes/no questions into the declarative form facts are stored in.
///
/// "is a connected to b" becomes "a is connected to b" and
/// "does a have access to b" becomes "a has access to b".
fn as_statement(query: &str) -> String {
    if let Some((subject, object)) = query
        .strip_prefix("is ")
        .and_then(|rest| rest.split_once(" connected to "))
    {
        return format!("{subject} is connected to {object}");
    }
    if let Some((subject, object)) = query
        .strip_prefix("does ")
        .and_then(|rest| rest.split_once(" have access to "))
    {
        return format!("{subject} has access to {object}");
    }
    if let Some((subject, area)) = query
        .strip_prefix("is ")
        .and_then(|rest| rest.split_once(" in "))
    {
        return format!("{subject} is in {area}");
    }
    query.to_string()
}
