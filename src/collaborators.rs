//! Fallback collaborators for utterances that are not route requests
//!
//! Each collaborator either answers or passes. They are consulted in a fixed
//! order and the first non-empty reply wins.

pub mod faq;
pub mod generative;
pub mod knowledge;
pub mod logic;

pub use faq::FaqTable;
pub use generative::GenerativeResponder;
pub use knowledge::{KeywordResponder, KnowledgeBase};
pub use logic::LogicEngine;

use crate::llm::LlmService;
use crate::navigation::Facility;
use async_trait::async_trait;
use std::sync::Arc;

/// A source of replies for free-form utterances
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Reply to the utterance, or `None` to pass to the next collaborator
    async fn respond(&self, utterance: &str) -> Option<String>;
}

/// Ordered list of collaborators
#[derive(Default)]
pub struct ResponderChain {
    responders: Vec<Arc<dyn Responder>>,
}

impl ResponderChain {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responders.push(responder);
        self
    }

    /// Logic handler, knowledge base, FAQ, then the generative model if configured
    pub fn standard(
        facility: Arc<Facility>,
        knowledge: Arc<KnowledgeBase>,
        faq: FaqTable,
        llm: Option<Arc<dyn LlmService>>,
    ) -> Self {
        let chain = Self::new()
            .with(Arc::new(LogicEngine::new(knowledge.clone(), facility)))
            .with(Arc::new(KeywordResponder::new(knowledge)))
            .with(Arc::new(faq));

        match llm {
            Some(llm) => chain.with(Arc::new(GenerativeResponder::new(llm))),
            None => chain,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.responders.iter().map(|r| r.name()).collect()
    }
}

#[async_trait]
impl Responder for ResponderChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        for responder in &self.responders {
            if let Some(reply) = responder.respond(utterance).await {
                if !reply.trim().is_empty() {
                    tracing::debug!(responder = responder.name(), "Collaborator answered");
                    return Some(reply);
                }
            }
        }
        None
    }
}
