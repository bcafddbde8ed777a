//! OpenAI provider client implementation
//! This module contains the actual client that makes requests to OpenAI's API

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

use super::config::{
    OpenAIConfig, CODE_MAX_TOKENS, DEFAULT_TEMPERATURE, STRUCTURE_MAX_TOKENS, WORKFLOW_MAX_TOKENS,
};
use super::types::{OpenAIChatMessage, OpenAIError, OpenAIRequest, OpenAIResponse};

/// OpenAI provider client
pub struct OpenAIClient {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIClient {
    /// Create a new OpenAI client with configuration
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: build_client(Some(Duration::from_secs(config.timeout_seconds))),
            config,
        }
    }

    /// Create a new OpenAI client with default configuration
    pub fn with_api_key(api_key: String) -> Self {
        let mut config = OpenAIConfig::default();
        config.api_key = api_key;
        Self::new(config)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build HTTP headers for requests
    fn build_headers(&self) -> LLMResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
                .map_err(|e| LLMError::Internal(format!("Invalid API key format: {}", e)))?,
        );

        // Add organization header if provided
        if let Some(org) = &self.config.organization {
            headers.insert(
                "OpenAI-Organization",
                HeaderValue::from_str(org)
                    .map_err(|e| LLMError::Internal(format!("Invalid organization format: {}", e)))?,
            );
        }

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

    /// Convert our internal request format to OpenAI's format
    fn convert_request(&self, request: &LLMRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(OpenAIChatMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: Some(request.max_tokens),
        }
    }

    /// Handle error responses from OpenAI
    fn handle_error_response(&self, status_code: u16, status_text: &str, error_text: &str) -> LLMError {
        // Try to parse as OpenAI error format
        let message = serde_json::from_str::<OpenAIError>(error_text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| status_text.to_string());

        match status_code {
            401 => LLMError::AuthenticationFailed(message),
            429 => LLMError::RateLimitExceeded(message),
            400 => LLMError::InvalidRequest(message),
            _ => LLMError::Api {
                provider: "OpenAI".to_string(),
                message,
            },
        }
    }

    /// Send a chat completion and return the first choice's text
    async fn complete(&self, request: LLMRequest) -> LLMResult<Option<String>> {
        let headers = self.build_headers()?;
        let openai_request = self.convert_request(&request);
        let request_url = format!("{}/chat/completions", self.config.base_url);

        debug!(
            "OpenAI API Request: id={}, URL={}, Model={}",
            request.id, request_url, request.model
        );

        let response = self
            .client
            .post(&request_url)
            .headers(headers)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        let response = match check_status(response).await {
            Ok(response) => response,
            Err(failure) => {
                error!("OpenAI API Error: {} - {}", failure.status, failure.body);
                return Err(self.handle_error_response(
                    failure.status.as_u16(),
                    &failure.status_text(),
                    &failure.body,
                ));
            }
        };

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Serialization(e.to_string()))?;

        if let Some(usage) = &openai_response.usage {
            debug!(
                "OpenAI usage for {}: prompt={} completion={} total={}",
                openai_response.model, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(openai_response.first_text())
    }
}

#[async_trait]
impl AIProvider for OpenAIClient {
    fn name(&self) -> &str {
        LLMProviderType::OpenAI.as_str()
    }

    fn provider_type(&self) -> LLMProviderType {
        LLMProviderType::OpenAI
    }

    async fn generate_code(&self, prompt: &str, options: &GenerationOptions) -> LLMResult<String> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let request = LLMRequest::new(
            model,
            vec![ChatMessage::system(CODE_SYSTEM_PROMPT), ChatMessage::user(prompt)],
            options.max_tokens.unwrap_or(CODE_MAX_TOKENS),
        )
        .with_temperature(Some(options.temperature.unwrap_or(DEFAULT_TEMPERATURE)));

        Ok(self.complete(request).await?.unwrap_or_default())
    }

    async fn generate_structure(&self, prompt: &str) -> LLMResult<Value> {
        let request = LLMRequest::new(
            self.config.default_model.clone(),
            vec![ChatMessage::system(STRUCTURE_SYSTEM_PROMPT), ChatMessage::user(prompt)],
            STRUCTURE_MAX_TOKENS,
        )
        .with_temperature(Some(DEFAULT_TEMPERATURE));

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
            vec![
                ChatMessage::system(workflow_system_prompt(workflow_type, true)),
                ChatMessage::user(workflow_user_prompt(workflow_type, description)),
            ],
            WORKFLOW_MAX_TOKENS,
        )
        .with_temperature(Some(DEFAULT_TEMPERATURE));

        let content = reply_or_empty_object(self.complete(request).await?);
        Ok(parse_workflow_reply(&content, workflow_type, description))
    }
}
