//! Last-resort answers from a generative model

use super::Responder;
use crate::llm::{LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const SYSTEM_PROMPT: &str = "You are the assistant of a waste management facility. \
Answer visitor questions about recycling, waste sorting and the facility in one or two short sentences.";

const RESPONSE_MARKER: &str = "Response:";
const MAX_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.3;
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GenerativeResponder {
    llm: Arc<dyn LlmService>,
    timeout: Duration,
}

impl GenerativeResponder {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self {
            llm,
            timeout: GENERATION_TIMEOUT,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Responder for GenerativeResponder {
    fn name(&self) -> &str {
        "generative"
    }

    async fn respond(&self, utterance: &str) -> Option<String> {
        let request = LlmRequest::single_turn(Some(SYSTEM_PROMPT), build_prompt(utterance))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        match timeout(self.timeout, self.llm.complete(&request)).await {
            Ok(Ok(response)) => extract_reply(&response.text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e.message, "Generative reply failed");
                None
            }
            Err(_) => {
                tracing::warn!(timeout_ms = %self.timeout.as_millis(), "Generative reply timed out");
                None
            }
        }
    }
}

fn build_prompt(utterance: &str) -> String {
    format!("Input: {utterance}\n{RESPONSE_MARKER}")
}

/// Text after the response marker when the model echoes the prompt
fn extract_reply(text: &str) -> Option<String> {
    let reply = match text.split_once(RESPONSE_MARKER) {
        Some((_, after)) => after,
        None => text,
    }
    .trim();

    if reply.is_empty() {
        None
    } else {
        Some(reply.to_string())
    }
}
