//! Simulated chat completions and usage accounting
//!
//! No model is called: the reply is a canned sentence quoting the prompt,
//! with fixed token usage and cost.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Artificial latency of a simulated reply
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(100);
pub const SIMULATED_TOKENS: u32 = 150;
pub const SIMULATED_COST: f64 = 0.003;

/// Characters of the prompt quoted back in the reply
const QUOTE_CHARS: usize = 30;
/// Characters of the prompt written to the request log
const LOG_CHARS: usize = 50;

/// Model tier a chat request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatModel {
    #[default]
    Fast,
    Smart,
    Cheap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    Chat,
    Generation,
    Analysis,
}

/// Who a request is billed to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContext {
    pub workspace_id: String,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: UsageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub text: String,
    pub usage: TokenUsage,
    pub cost: f64,
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

/// Produce a simulated reply for `prompt`
pub async fn generate_simple_response(prompt: &str, context: &UsageContext) -> SimpleResponse {
    info!(
        "AI request for workspace {}: {}...",
        context.workspace_id,
        prefix(prompt, LOG_CHARS)
    );

    tokio::time::sleep(SIMULATED_LATENCY).await;

    SimpleResponse {
        text: format!(
            "This is a simulated AI response to: \"{}...\" - Generated for workspace {}",
            prefix(prompt, QUOTE_CHARS),
            context.workspace_id
        ),
        usage: TokenUsage {
            total_tokens: SIMULATED_TOKENS,
        },
        cost: SIMULATED_COST,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub allowed: bool,
    pub remaining: u64,
}

/// Usage accounting; limits are never enforced
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageTracker;

impl UsageTracker {
    pub fn new() -> Self {
        Self
    }

    pub async fn check_limits(&self) -> UsageLimits {
        UsageLimits {
            allowed: true,
            remaining: 10_000,
        }
    }

    pub async fn log_usage(&self, context: &UsageContext, tokens: u32, cost: f64) {
        info!(
            "AI usage: {:?} - {} tokens - ${:.4}",
            context.kind, tokens, cost
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> UsageContext {
        UsageContext {
            workspace_id: "ws-1".to_string(),
            user_id: Some("user_1".to_string()),
            kind: UsageKind::Chat,
        }
    }

    #[tokio::test]
    async fn test_reply_quotes_first_thirty_chars() {
        let prompt = "Summarise the quarterly revenue report for the board";
        let response = generate_simple_response(prompt, &context()).await;

        assert_eq!(
            response.text,
            "This is a simulated AI response to: \"Summarise the quarterly revenu...\" - Generated for workspace ws-1"
        );
        assert_eq!(response.usage.total_tokens, 150);
        assert_eq!(response.cost, 0.003);
    }

    #[tokio::test]
    async fn test_short_prompt_is_quoted_whole() {
        let response = generate_simple_response("hi", &context()).await;
        assert!(response.text.contains("\"hi...\""));
    }

    #[tokio::test]
    async fn test_limits_always_allow() {
        let limits = UsageTracker::new().check_limits().await;
        assert!(limits.allowed);
        assert_eq!(limits.remaining, 10_000);
    }

    #[test]
    fn test_chat_model_wire_names() {
        assert_eq!(serde_json::to_value(ChatModel::Smart).unwrap(), "smart");
        assert_eq!(ChatModel::default(), ChatModel::Fast);
    }
}
