//! LLM Provider Abstraction
//!
//! This module provides the provider-neutral types used by every LLM backend:
//! what can be generated, the knobs a caller may set, the internal request
//! shape handed to a provider client, and the error type the provider layer
//! reports.
//!
//! It also owns the one policy every provider shares: a reply that was
//! expected to be JSON but does not parse is turned into a fallback object
//! instead of an error (see [`parse_structured_reply`]).

pub mod prompts;
pub mod providers;
pub mod service;
pub mod traits;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

/// Error marker placed in the fallback object when a provider reply is not JSON
pub const INVALID_JSON_RESPONSE: &str = "Invalid JSON response";

/// LLM Provider types supported by SaaS Forge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LLMProviderType {
    OpenAI,
    Anthropic,
}

impl LLMProviderType {
    /// Registry key used by [`service::AIService`]
    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProviderType::OpenAI => "openai",
            LLMProviderType::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for LLMProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of artifact `generate_code` should produce
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Component,
    Api,
    Schema,
    Config,
    Content,
    Automation,
}

impl GenerationType {
    pub const ALL: [GenerationType; 6] = [
        GenerationType::Component,
        GenerationType::Api,
        GenerationType::Schema,
        GenerationType::Config,
        GenerationType::Content,
        GenerationType::Automation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationType::Component => "component",
            GenerationType::Api => "api",
            GenerationType::Schema => "schema",
            GenerationType::Config => "config",
            GenerationType::Content => "content",
            GenerationType::Automation => "automation",
        }
    }
}

impl std::fmt::Display for GenerationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationType {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LLMError::InvalidRequest(format!("Unknown generation type: {}", s)))
    }
}

/// Automation backend a generated workflow document targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    N8n,
    Flowise,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::N8n => "n8n",
            WorkflowType::Flowise => "flowise",
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n8n" => Ok(WorkflowType::N8n),
            "flowise" => Ok(WorkflowType::Flowise),
            other => Err(LLMError::InvalidRequest(format!(
                "Unknown workflow type: {}",
                other
            ))),
        }
    }
}

/// Optional overrides for `generate_code`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Chat message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Message roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Provider-neutral completion request handed to a provider client
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub id: Uuid,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

impl LLMRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            messages,
            temperature: None,
            max_tokens,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Error types for LLM operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum LLMError {
    /// The caller asked for a provider the registry does not hold
    #[error("AI provider {0} not available")]
    ProviderNotConfigured(String),

    #[error("Rate limit exceeded for provider: {0}")]
    RateLimitExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-2xx reply that is not covered by a more specific variant
    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, LLMError>;

/// Parse a reply that should be a JSON document.
///
/// Never fails: a reply that does not parse becomes
/// `{"error": "Invalid JSON response", "rawResponse": <reply>}`.
pub fn parse_structured_reply(content: &str) -> Value {
    serde_json::from_str(content).unwrap_or_else(|_| {
        json!({
            "error": INVALID_JSON_RESPONSE,
            "rawResponse": content,
        })
    })
}

/// Same policy as [`parse_structured_reply`], echoing the workflow type and
/// description in the fallback object.
pub fn parse_workflow_reply(content: &str, workflow_type: WorkflowType, description: &str) -> Value {
    serde_json::from_str(content).unwrap_or_else(|_| {
        json!({
            "error": INVALID_JSON_RESPONSE,
            "rawResponse": content,
            "type": workflow_type,
            "description": description,
        })
    })
}

/// Substitute `{}` for a missing reply before a structured parse
pub(crate) fn reply_or_empty_object(reply: Option<String>) -> String {
    match reply {
        Some(text) if !text.is_empty() => text,
        _ => "{}".to_string(),
    }
}
