// Request bodies, response envelopes and error responses for the REST API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::chat::{ChatModel, TokenUsage};
use crate::llm::{GenerationOptions, LLMError};

/// Generic message for failures whose cause is not surfaced
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Maximum chat message length, in characters
pub const MAX_CHAT_MESSAGE_CHARS: usize = 1000;

/// Treat an empty string like a missing field
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Unwrap a JSON body, turning a malformed one into a 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /api/ai/generate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub specification: Option<String>,
    pub provider: Option<String>,
    pub options: GenerationOptions,
}

/// POST /api/ai/saas
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaasRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub provider: Option<String>,
}

/// POST /api/ai/workflows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowRequest {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub provider: Option<String>,
}

/// POST /api/ai/chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub model: ChatModel,
}

impl ChatRequest {
    /// Field-level problems, empty when the request is valid
    pub fn validate(&self) -> Vec<Value> {
        let length = self.message.chars().count();
        let mut problems = Vec::new();
        if length < 1 {
            problems.push(json!({
                "path": ["message"],
                "message": "String must contain at least 1 character(s)"
            }));
        }
        if length > MAX_CHAT_MESSAGE_CHARS {
            problems.push(json!({
                "path": ["message"],
                "message": format!(
                    "String must contain at most {} character(s)",
                    MAX_CHAT_MESSAGE_CHARS
                )
            }));
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub usage: TokenUsage,
    pub cost: f64,
}

/// POST /api/automation/{flowise,n8n}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionRequest {
    pub action: Option<String>,
    pub params: Option<Value>,
}

/// POST /api/automation/flowise/chat
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowiseChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub override_config: Option<Value>,
}

/// POST /api/automation/n8n/workflows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateWorkflowRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub nodes: Option<Vec<Value>>,
    pub connections: Option<Value>,
    pub active: bool,
}

/// POST /api/automation/n8n/execute
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecuteWorkflowRequest {
    pub workflow_id: Option<String>,
    pub data: Option<Value>,
}

/// `{ success: true, data, timestamp }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: crate::iso_timestamp(),
        }
    }
}

/// API error response.
///
/// Client and configuration errors render as `{ "error": ... }`; upstream
/// failures render as `{ "success": false, "error": ... }`.
#[derive(Debug, Clone)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    InvalidFormat(Vec<Value>),
    ServiceUnavailable(String),
    /// 500 carrying the underlying message
    Upstream(String),
    /// 500 with the generic message only
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LLMError> for ApiError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::ProviderNotConfigured(_) => ApiError::ServiceUnavailable(err.to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Unauthorized => json!({ "error": "Unauthorized" }),
            ApiError::BadRequest(message) | ApiError::ServiceUnavailable(message) => {
                json!({ "error": message })
            }
            ApiError::InvalidFormat(details) => {
                json!({ "error": "Invalid request format", "details": details })
            }
            ApiError::Upstream(message) => json!({ "success": false, "error": message }),
            ApiError::Internal => json!({ "error": INTERNAL_SERVER_ERROR }),
        };

        (status, Json(body)).into_response()
    }
}
