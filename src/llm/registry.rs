//! Generative model configuration and construction

use super::anthropic::DEFAULT_MODEL;
use super::{AnthropicService, LlmService, LoggingService};
use std::sync::Arc;

/// Configuration for the generative model provider
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    /// Gateway URL; when set the gateway handles authentication
    pub gateway: Option<String>,
    pub model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            model: std::env::var("LLM_MODEL").ok(),
        }
    }

    pub fn model_id(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Build the configured service, or `None` when no provider is usable.
    pub fn build(&self) -> Option<Arc<dyn LlmService>> {
        // In gateway mode, use "implicit" as the API key
        let api_key = if self.gateway.is_some() {
            "implicit".to_string()
        } else {
            self.anthropic_api_key.clone()?
        };

        if self.gateway.is_none() && api_key.trim().is_empty() {
            return None;
        }

        match AnthropicService::new(api_key, self.model_id().to_string(), self.gateway.as_deref()) {
            Ok(service) => Some(Arc::new(LoggingService::new(Arc::new(service)))),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create generative model client");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_api_key_no_service() {
        assert!(LlmConfig::default().build().is_none());
    }

    #[test]
    fn test_empty_api_key_no_service() {
        let config = LlmConfig {
            anthropic_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.build().is_none());
    }

    #[test]
    fn test_api_key_builds_default_model() {
        let config = LlmConfig {
            anthropic_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let service = config.build().unwrap();
        assert_eq!(service.model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn test_gateway_needs_no_key() {
        let config = LlmConfig {
            gateway: Some("http://localhost:9000".to_string()),
            model: Some("claude-sonnet-4-5".to_string()),
            ..Default::default()
        };
        let service = config.build().unwrap();
        assert_eq!(service.model_id(), "claude-sonnet-4-5");
    }
}
