//! Anthropic provider client implementation
//! This module contains the actual client that makes requests to Anthropic's API

use async_trait::async_trait;
use reqwest::{header::HeaderMap, header::HeaderValue, header::CONTENT_TYPE, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::http::{build_client, check_status};
use crate::llm::{
    parse_structured_reply, parse_workflow_reply,
    prompts::{
        workflow_system_prompt, workflow_user_prompt, CODE_SYSTEM_PROMPT, STRUCTURE_SYSTEM_PROMPT,
    },
    reply_or_empty_object,
    traits::AIProvider,
    ChatMessage, GenerationOptions, LLMError, LLMProviderType, LLMRequest, LLMResult,
    WorkflowType,
};

use super::config::{AnthropicConfig, CODE_MAX_TOKENS, STRUCTURE_MAX_TOKENS, WORKFLOW_MAX_TOKENS};
use super::types::{AnthropicError, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Anthropic provider client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

/// Fold an instruction into the user turn, separated by a blank line
fn instructed(instruction: &str, prompt: &str) -> ChatMessage {
    ChatMessage::user(format!("{}\n\n{}", instruction, prompt))
}

impl AnthropicClient {
    /// Create a new Anthropic client with configuration
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: build_client(Some(Duration::from_secs(config.timeout_seconds))),
            config,
        }
    }

    /// Create a new Anthropic client with default configuration
    pub fn with_api_key(api_key: String) -> Self {
        let mut config = AnthropicConfig::default();
        config.api_key = api_key;
        Self::new(config)
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Build HTTP headers for requests
    fn build_headers(&self) -> LLMResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|e| LLMError::Internal(format!("Invalid API key format: {}", e)))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.config.api_version)
                .map_err(|e| LLMError::Internal(format!("Invalid API version format: {}", e)))?,
        );

        // Add custom headers
        for (key, value) in &self.config.custom_headers {
            let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| LLMError::Internal(format!("Invalid header key: {}", e)))?;
            headers.insert(
                header_name,
                HeaderValue::from_str(value)
                    .map_err(|e| LLMError::Internal(format!("Invalid header value: {}", e)))?,
            );
        }

        Ok(headers)
    }

    /// Convert our internal request format to Anthropic's format
    fn convert_request(&self, request: &LLMRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(AnthropicMessage::from).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Handle error responses from Anthropic
    fn handle_error_response(&self, status_code: u16, status_text: &str, error_text: &str) -> LLMError {
        // Try to parse as Anthropic error format
        let message = serde_json::from_str::<AnthropicError>(error_text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| status_text.to_string());

        match status_code {
            401 => LLMError::AuthenticationFailed(message),
            429 => LLMError::RateLimitExceeded(message),
            400 => LLMError::InvalidRequest(message),
            _ => LLMError::Api {
                provider: "Anthropic".to_string(),
                message,
            },
        }
    }

    /// Send a Messages API request and return the first text block
    async fn complete(&self, request: LLMRequest) -> LLMResult<Option<String>> {
        let headers = self.build_headers()?;
        let anthropic_request = self.convert_request(&request);
        let request_url = format!("{}/v1/messages", self.config.base_url);

        debug!(
            "Anthropic API Request: id={}, URL={}, Model={}",
            request.id, request_url, request.model
        );

        let response = self
            .client
            .post(&request_url)
            .headers(headers)
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        let response = match check_status(response).await {
            Ok(response) => response,
            Err(failure) => {
                error!("Anthropic API Error: {} - {}", failure.status, failure.body);
                return Err(self.handle_error_response(
                    failure.status.as_u16(),
                    &failure.status_text(),
                    &failure.body,
                ));
            }
        };

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Serialization(e.to_string()))?;

        if let Some(usage) = &anthropic_response.usage {
            debug!(
                "Anthropic usage for {}: input={} output={} stop={:?}",
                anthropic_response.model,
                usage.input_tokens,
                usage.output_tokens,
                anthropic_response.stop_reason
            );
        }

        Ok(anthropic_response.first_text())
    }
}

#[async_trait]
impl AIProvider for AnthropicClient {
    fn name(&self) -> &str {
        LLMProviderType::Anthropic.as_str()
    }

    fn provider_type(&self) -> LLMProviderType {
        LLMProviderType::Anthropic
    }

    async fn generate_code(&self, prompt: &str, options: &GenerationOptions) -> LLMResult<String> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let request = LLMRequest::new(
            model,
            vec![instructed(CODE_SYSTEM_PROMPT, prompt)],
            options.max_tokens.unwrap_or(CODE_MAX_TOKENS),
        )
        .with_temperature(options.temperature);

        Ok(self.complete(request).await?.unwrap_or_default())
    }

    async fn generate_structure(&self, prompt: &str) -> LLMResult<Value> {
        let request = LLMRequest::new(
            self.config.default_model.clone(),
            vec![instructed(STRUCTURE_SYSTEM_PROMPT, prompt)],
            STRUCTURE_MAX_TOKENS,
        );

        let content = reply_or_empty_object(self.complete(request).await?);
        Ok(parse_structured_reply(&content))
    }

    async fn generate_workflow(
        &self,
        description: &str,
        workflow_type: WorkflowType,
    ) -> LLMResult<Value> {
        let request = LLMRequest::new(
            self.config.default_model.clone(),
            vec![instructed(
                &workflow_system_prompt(workflow_type, false),
                &workflow_user_prompt(workflow_type, description),
            )],
            WORKFLOW_MAX_TOKENS,
        );

        let content = reply_or_empty_object(self.complete(request).await?);
        Ok(parse_workflow_reply(&content, workflow_type, description))
    }
}
