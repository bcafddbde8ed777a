//! OpenAI provider-specific types and structures
//! This module contains the request/response types of the chat completions API

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, MessageRole};

/// OpenAI API request structure for chat completions
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// OpenAI chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI API response structure
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI choice in response
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub index: u32,
    pub message: Option<OpenAIChatMessage>,
    pub finish_reason: Option<String>,
}

/// OpenAI usage statistics
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI error response
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub error: OpenAIErrorDetails,
}

/// OpenAI error details
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorDetails {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<serde_json::Value>,
}

impl OpenAIResponse {
    /// Text of the first choice, if the model returned any
    pub fn first_text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .filter(|content| !content.is_empty())
    }
}

impl From<&ChatMessage> for OpenAIChatMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: match msg.role {
                MessageRole::System => "system".to_string(),
                MessageRole::User => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
            },
            content: Some(msg.content.clone()),
        }
    }
}
