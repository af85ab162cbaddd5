//! OpenAI-compatible chat-completion provider

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::llm::{
    errors::{LlmError, LlmResult},
    provider::{utils, LlmProvider, ProviderClientOptions},
    types::{ChatRequest, CompletionResponse, FinishReason, ProviderConfig, TokenUsage},
};

/// OpenAI API provider
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: Client,
    config: ProviderConfig,
    options: ProviderClientOptions,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(config: ProviderConfig, options: ProviderClientOptions) -> LlmResult<Self> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = &config.api_key {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| LlmError::ConfigError(format!("Invalid API key: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        } else {
            return Err(LlmError::ConfigError("API key is required".to_string()));
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(&options.user_agent)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            options,
        })
    }

    /// Convert a request to wire messages, system prompt first
    fn convert_messages(request: &ChatRequest) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system_message {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(ApiMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            });
        }

        messages
    }

    /// Get the API endpoint URL
    fn get_endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        format!("{}/v1/chat/completions", base_url)
    }

    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": Self::convert_messages(request),
        });

        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(temperature) = request.temperature.or(self.config.temperature) {
            body["temperature"] = json!(temperature);
        }

        if let Some(top_p) = request.top_p.or(self.config.top_p) {
            body["top_p"] = json!(top_p);
        }

        body
    }

    /// Execute a request, retrying forever at a fixed delay while rate limited.
    ///
    /// Every other failure propagates to the caller.
    async fn execute_request(&self, request_body: serde_json::Value) -> LlmResult<ApiResponse> {
        loop {
            let response = self
                .client
                .post(self.get_endpoint())
                .json(&request_body)
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let message = utils::extract_error_message(response).await;
                warn!(
                    "Rate limit reached ({}). Retrying in {} seconds...",
                    message,
                    self.options.rate_limit_delay.as_secs()
                );
                tokio::time::sleep(self.options.rate_limit_delay).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let message = utils::extract_error_message(response).await;
                return Err(match status.as_u16() {
                    401 | 403 => LlmError::AuthError(message),
                    400 if message.contains("context_length_exceeded") => {
                        LlmError::ContextLimitError(message)
                    }
                    _ => LlmError::ApiError(message),
                });
            }

            return Ok(response.json::<ApiResponse>().await?);
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn chat_completion(&self, request: ChatRequest) -> LlmResult<CompletionResponse> {
        let request_body = self.build_request_body(&request);
        let response = self.execute_request(request_body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ApiError("No choices in response".to_string()))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("stop") => Some(FinishReason::Stop),
            Some("length") => Some(FinishReason::Length),
            Some("content_filter") => Some(FinishReason::ContentFilter),
            _ => None,
        };

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: TokenUsage {
                input_tokens: response.usage.prompt_tokens,
                output_tokens: response.usage.completion_tokens,
                total_tokens: response.usage.total_tokens,
            },
            finish_reason,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn validate_config(&self) -> LlmResult<()> {
        if self.config.api_key.is_none() {
            return Err(LlmError::ConfigError("API key is required".to_string()));
        }

        if self.config.model.is_empty() {
            return Err(LlmError::ConfigError("Model is required".to_string()));
        }

        Ok(())
    }
}

// OpenAI API types
#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
