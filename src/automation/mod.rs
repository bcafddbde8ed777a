//! Workflow-automation backends (Flowise and n8n)
//!
//! [`AutomationService`] holds whichever backends are configured and exposes
//! a string-keyed action dispatcher whose outcome is always an
//! [`AutomationResult`], never an error.

pub mod flowise;
pub mod n8n;

use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::http::check_status;
use flowise::{FlowiseConfig, FlowiseService, SendMessageOptions};
use n8n::{N8nConfig, N8nService};

/// Automation backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationKind {
    Flowise,
    N8n,
}

impl AutomationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutomationKind::Flowise => "flowise",
            AutomationKind::N8n => "n8n",
        }
    }

    /// Name used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            AutomationKind::Flowise => "Flowise",
            AutomationKind::N8n => "n8n",
        }
    }
}

impl fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutomationKind {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flowise" => Ok(AutomationKind::Flowise),
            "n8n" => Ok(AutomationKind::N8n),
            other => Err(AutomationError::InvalidParams(format!(
                "Unknown automation service: {}",
                other
            ))),
        }
    }
}

/// Errors raised by automation backends
#[derive(Error, Debug, Clone)]
pub enum AutomationError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("{backend} API error: {status_text}")]
    Api {
        backend: &'static str,
        status: u16,
        status_text: String,
    },

    #[error("Unknown {backend} action: {action}")]
    UnknownAction {
        backend: &'static str,
        action: String,
    },

    #[error("Service {0} not available or not configured")]
    ServiceUnavailable(AutomationKind),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type BackendResult<T> = std::result::Result<T, AutomationError>;

/// Send a request and map transport and non-2xx failures for `backend`
pub(crate) async fn send_checked(
    backend: &'static str,
    builder: RequestBuilder,
) -> BackendResult<Response> {
    let response = builder
        .send()
        .await
        .map_err(|e| AutomationError::Network(e.to_string()))?;

    check_status(response).await.map_err(|failure| {
        error!("{} API error: {} - {}", backend, failure.status, failure.body);
        AutomationError::Api {
            backend,
            status: failure.status.as_u16(),
            status_text: failure.status_text(),
        }
    })
}

/// Outcome of an automation action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    pub timestamp: String,
}

impl AutomationResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            execution_id: None,
            timestamp: crate::iso_timestamp(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            execution_id: None,
            timestamp: crate::iso_timestamp(),
        }
    }
}

/// Reachability of each backend; unconfigured backends report `false`
/// without an error entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationHealth {
    pub flowise: bool,
    pub n8n: bool,
    pub errors: Vec<String>,
}

/// Which backends are configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableServices {
    pub flowise: bool,
    pub n8n: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AutomationConfig {
    pub flowise: Option<FlowiseConfig>,
    pub n8n: Option<N8nConfig>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

impl AutomationConfig {
    /// A backend is configured when its base URL variable is set
    pub fn from_env() -> Self {
        let flowise = env_value("FLOWISE_BASE_URL").map(|base_url| FlowiseConfig {
            base_url,
            api_key: env_value("FLOWISE_API_KEY"),
            chatflow_id: env_value("FLOWISE_CHATFLOW_ID"),
        });

        let n8n = env_value("N8N_BASE_URL").map(|base_url| N8nConfig {
            base_url,
            api_key: env_value("N8N_API_KEY"),
            webhook_url: env_value("N8N_WEBHOOK_URL"),
        });

        Self { flowise, n8n }
    }
}

/// Composes the configured automation backends
#[derive(Debug, Clone, Default)]
pub struct AutomationService {
    flowise: Option<FlowiseService>,
    n8n: Option<N8nService>,
}

impl AutomationService {
    pub fn new(config: AutomationConfig) -> Self {
        Self {
            flowise: config.flowise.map(FlowiseService::new),
            n8n: config.n8n.map(N8nService::new),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AutomationConfig::from_env())
    }

    pub fn flowise_service(&self) -> Option<&FlowiseService> {
        self.flowise.as_ref()
    }

    pub fn n8n_service(&self) -> Option<&N8nService> {
        self.n8n.as_ref()
    }

    pub fn available_services(&self) -> AvailableServices {
        AvailableServices {
            flowise: self.flowise.is_some(),
            n8n: self.n8n.is_some(),
        }
    }

    /// Run a named action against a backend.
    ///
    /// Flowise: `sendMessage`, `getChatflows`.
    /// n8n: `executeWorkflow`, `getWorkflows`, `getExecutions`.
    pub async fn execute_automation(
        &self,
        kind: AutomationKind,
        action: &str,
        params: &Value,
    ) -> AutomationResult {
        info!("Executing {} action {}", kind, action);
        match self.dispatch(kind, action, params).await {
            Ok(result) => result,
            Err(e) => {
                warn!("{} action {} failed: {}", kind, action, e);
                AutomationResult::failed(e.to_string())
            }
        }
    }

    async fn dispatch(
        &self,
        kind: AutomationKind,
        action: &str,
        params: &Value,
    ) -> BackendResult<AutomationResult> {
        match kind {
            AutomationKind::Flowise => {
                let service = self
                    .flowise
                    .as_ref()
                    .ok_or(AutomationError::ServiceUnavailable(kind))?;
                match action {
                    "sendMessage" => {
                        let message = string_param(params, "message").ok_or_else(|| {
                            AutomationError::InvalidParams("message is required".to_string())
                        })?;
                        let options = match params.get("options") {
                            Some(options) if !options.is_null() => {
                                serde_json::from_value::<SendMessageOptions>(options.clone())
                                    .map_err(|e| AutomationError::InvalidParams(e.to_string()))?
                            }
                            _ => SendMessageOptions::default(),
                        };
                        let reply = service.send_message(message, &options).await?;
                        Ok(AutomationResult::ok(reply))
                    }
                    "getChatflows" => {
                        let flows = service.get_chatflows().await?;
                        Ok(AutomationResult::ok(to_value(&flows)?))
                    }
                    other => Err(AutomationError::UnknownAction {
                        backend: kind.label(),
                        action: other.to_string(),
                    }),
                }
            }
            AutomationKind::N8n => {
                let service = self
                    .n8n
                    .as_ref()
                    .ok_or(AutomationError::ServiceUnavailable(kind))?;
                match action {
                    "executeWorkflow" => {
                        let workflow_id = string_param(params, "workflowId").ok_or_else(|| {
                            AutomationError::InvalidParams("workflowId is required".to_string())
                        })?;
                        let data = params.get("data").filter(|d| !d.is_null()).cloned();
                        service.execute_workflow(workflow_id, data).await
                    }
                    "getWorkflows" => {
                        let workflows = service.get_workflows().await?;
                        Ok(AutomationResult::ok(to_value(&workflows)?))
                    }
                    "getExecutions" => {
                        let executions = service
                            .get_executions(string_param(params, "workflowId"))
                            .await?;
                        Ok(AutomationResult::ok(Value::Array(executions)))
                    }
                    other => Err(AutomationError::UnknownAction {
                        backend: kind.label(),
                        action: other.to_string(),
                    }),
                }
            }
        }
    }

    /// Probe each configured backend concurrently
    pub async fn health_check(&self) -> AutomationHealth {
        let flowise_probe = async {
            match &self.flowise {
                Some(service) => Some(service.get_chatflows().await.map(|_| ())),
                None => None,
            }
        };
        let n8n_probe = async {
            match &self.n8n {
                Some(service) => Some(service.get_workflows().await.map(|_| ())),
                None => None,
            }
        };

        let (flowise, n8n) = tokio::join!(flowise_probe, n8n_probe);

        let mut health = AutomationHealth::default();
        match flowise {
            Some(Ok(())) => health.flowise = true,
            Some(Err(e)) => health
                .errors
                .push(format!("Flowise health check failed: {}", e)),
            None => {}
        }
        match n8n {
            Some(Ok(())) => health.n8n = true,
            Some(Err(e)) => health.errors.push(format!("n8n health check failed: {}", e)),
            None => {}
        }
        health
    }
}

fn string_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

fn to_value<T: Serialize>(value: &T) -> BackendResult<Value> {
    serde_json::to_value(value).map_err(|e| AutomationError::Serialization(e.to_string()))
}
