//! Anthropic provider-specific types and structures
//! This module contains the request/response types of the Messages API

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, MessageRole};

/// Anthropic API request structure
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Anthropic message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Anthropic API response structure
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

/// Anthropic content block
#[derive(Debug, Deserialize)]
pub struct AnthropicContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: Option<String>,
}

/// Anthropic usage statistics
#[derive(Debug, Deserialize)]
pub struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Anthropic error response
#[derive(Debug, Deserialize)]
pub struct AnthropicError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: AnthropicErrorDetails,
}

/// Anthropic error details
#[derive(Debug, Deserialize)]
pub struct AnthropicErrorDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl AnthropicResponse {
    /// Text of the first content block, if the model returned any
    pub fn first_text(&self) -> Option<String> {
        self.content
            .first()
            .and_then(|block| block.text.clone())
            .filter(|text| !text.is_empty())
    }
}

impl From<&ChatMessage> for AnthropicMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: match msg.role {
                MessageRole::Assistant => "assistant".to_string(),
                // The Messages API has no system role inside `messages`
                MessageRole::System | MessageRole::User => "user".to_string(),
            },
            content: msg.content.clone(),
        }
    }
}
