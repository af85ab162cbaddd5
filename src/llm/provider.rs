//! Provider trait and factory for LLM providers

use async_trait::async_trait;
use std::time::Duration;

use crate::llm::{
    errors::{LlmError, LlmResult},
    openai::OpenAIProvider,
    types::{ChatRequest, CompletionResponse, ProviderConfig},
};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and get a response
    async fn chat_completion(&self, request: ChatRequest) -> LlmResult<CompletionResponse>;

    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model name
    fn model(&self) -> &str;

    /// Validate the configuration
    fn validate_config(&self) -> LlmResult<()>;
}

/// Factory for creating LLM providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a new provider from configuration
    pub fn create_provider(
        config: ProviderConfig,
        options: ProviderClientOptions,
    ) -> LlmResult<Box<dyn LlmProvider>> {
        match config.provider_type.as_str() {
            "openai" => {
                let provider = OpenAIProvider::new(config, options)?;
                Ok(Box::new(provider))
            }
            _ => Err(LlmError::ConfigError(format!(
                "Unsupported provider type: {}",
                config.provider_type
            ))),
        }
    }

    /// Get available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai"]
    }
}

/// Provider client options for flexible configuration
#[derive(Debug, Clone)]
pub struct ProviderClientOptions {
    /// Fixed delay before retrying a rate-limited request
    pub rate_limit_delay: Duration,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ProviderClientOptions {
    fn default() -> Self {
        Self {
            rate_limit_delay: Duration::from_secs(15),
            timeout_seconds: 300,
            user_agent: "surveysim/0.1".to_string(),
        }
    }
}

/// Utility functions for provider implementations
pub mod utils {
    /// Extract error message from HTTP response
    pub async fn extract_error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(text) => {
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                    if let Some(message) = json
                        .get("error")
                        .and_then(|error| error.get("message"))
                        .and_then(|message| message.as_str())
                    {
                        return format!("{}: {}", status, message);
                    }
                }
                format!("{}: {}", status, text)
            }
            Err(_) => format!("{}: Failed to read error response", status),
        }
    }
}
