//! n8n client
//!
//! Wraps the n8n REST API (`/api/v1/workflows`, `/api/v1/executions`).
//! List endpoints return `{ "data": [...] }`; the wrapper is unwrapped here.

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::{send_checked, AutomationError, AutomationResult, BackendResult};
use crate::http::build_client;

const BACKEND: &str = "n8n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct N8nConfig {
    pub base_url: String,
    /// Sent as `X-N8N-API-KEY`
    pub api_key: Option<String>,
    pub webhook_url: Option<String>,
}

impl N8nConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            webhook_url: None,
        }
    }
}

/// An n8n workflow record; unmodelled fields are kept in `extra`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct N8nWorkflow {
    /// n8n 0.x issues numeric ids, 1.x issues strings; both are kept as text
    #[serde(
        default,
        deserialize_with = "id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ "data": [...] }`; a missing or null `data` reads as empty
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<Vec<T>>,
}

impl<T> DataEnvelope<T> {
    fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<Value>::deserialize(deserializer)?;
    Ok(id.as_ref().and_then(id_text))
}

#[derive(Debug, Clone)]
pub struct N8nService {
    client: Client,
    config: N8nConfig,
}

impl N8nService {
    pub fn new(config: N8nConfig) -> Self {
        Self {
            client: build_client(None),
            config,
        }
    }

    pub fn config(&self) -> &N8nConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("n8n request: {} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.config.api_key {
            Some(api_key) => builder.header("X-N8N-API-KEY", api_key),
            None => builder,
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> BackendResult<T> {
        send_checked(BACKEND, builder)
            .await?
            .json()
            .await
            .map_err(|e| AutomationError::Serialization(e.to_string()))
    }

    pub async fn get_workflows(&self) -> BackendResult<Vec<N8nWorkflow>> {
        let envelope: DataEnvelope<N8nWorkflow> = self
            .send_json(self.request(Method::GET, "/api/v1/workflows"))
            .await?;
        Ok(envelope.into_data())
    }

    pub async fn create_workflow(&self, workflow: &N8nWorkflow) -> BackendResult<N8nWorkflow> {
        self.send_json(self.request(Method::POST, "/api/v1/workflows").json(workflow))
            .await
    }

    pub async fn update_workflow(
        &self,
        id: &str,
        workflow: &N8nWorkflow,
    ) -> BackendResult<N8nWorkflow> {
        self.send_json(
            self.request(Method::PUT, &format!("/api/v1/workflows/{}", id))
                .json(workflow),
        )
        .await
    }

    /// Activate or deactivate a workflow
    pub async fn set_workflow_active(&self, id: &str, active: bool) -> BackendResult<N8nWorkflow> {
        let verb = if active { "activate" } else { "deactivate" };
        self.send_json(self.request(Method::POST, &format!("/api/v1/workflows/{}/{}", id, verb)))
            .await
    }

    pub async fn delete_workflow(&self, id: &str) -> BackendResult<()> {
        send_checked(
            BACKEND,
            self.request(Method::DELETE, &format!("/api/v1/workflows/{}", id)),
        )
        .await?;
        Ok(())
    }

    /// List executions, optionally filtered to one workflow
    pub async fn get_executions(&self, workflow_id: Option<&str>) -> BackendResult<Vec<Value>> {
        let mut builder = self.request(Method::GET, "/api/v1/executions");
        if let Some(workflow_id) = workflow_id {
            let filter = json!({ "workflowId": workflow_id }).to_string();
            builder = builder.query(&[("filter", filter)]);
        }

        let envelope: DataEnvelope<Value> = self.send_json(builder).await?;
        Ok(envelope.into_data())
    }

    /// Run a workflow and normalise n8n's reply into an [`AutomationResult`].
    ///
    /// `success` is true only when the reply's `data.finished` is `true`.
    pub async fn execute_workflow(
        &self,
        id: &str,
        data: Option<Value>,
    ) -> BackendResult<AutomationResult> {
        let body = match data {
            Some(data) => json!({ "data": data }),
            None => json!({}),
        };

        let reply: Value = self
            .send_json(
                self.request(Method::POST, &format!("/api/v1/workflows/{}/execute", id))
                    .json(&body),
            )
            .await?;

        info!("Executed n8n workflow {}", id);
        Ok(normalize_execution(reply))
    }
}

fn normalize_execution(reply: Value) -> AutomationResult {
    let execution = reply.get("data");
    let finished = execution
        .and_then(|d| d.get("finished"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let execution_id = execution.and_then(|d| d.get("id")).and_then(id_text);
    let data = execution.cloned();

    AutomationResult {
        success: finished,
        data,
        error: None,
        execution_id,
        timestamp: crate::iso_timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_execution_is_success() {
        let result = normalize_execution(json!({"data": {"id": "42", "finished": true}}));
        assert!(result.success);
        assert_eq!(result.execution_id.as_deref(), Some("42"));
        assert_eq!(result.data, Some(json!({"id": "42", "finished": true})));
    }

    #[test]
    fn test_unfinished_or_missing_data_is_not_success() {
        let pending = normalize_execution(json!({"data": {"id": 7, "finished": false}}));
        assert!(!pending.success);
        assert_eq!(pending.execution_id.as_deref(), Some("7"));

        let empty = normalize_execution(json!({}));
        assert!(!empty.success);
        assert!(empty.data.is_none());
        assert!(empty.execution_id.is_none());
    }

    #[test]
    fn test_workflow_envelope_defaults_to_empty() {
        let missing: DataEnvelope<N8nWorkflow> = serde_json::from_value(json!({})).unwrap();
        assert!(missing.into_data().is_empty());

        let null: DataEnvelope<N8nWorkflow> =
            serde_json::from_value(json!({"data": null})).unwrap();
        assert!(null.into_data().is_empty());
    }

    #[test]
    fn test_numeric_workflow_id_reads_as_text() {
        let envelope: DataEnvelope<N8nWorkflow> = serde_json::from_value(json!({
            "data": [
                {"id": 1, "name": "legacy", "active": false},
                {"id": "a1B2", "name": "current"}
            ]
        }))
        .unwrap();
        let workflows = envelope.into_data();

        assert_eq!(workflows[0].id.as_deref(), Some("1"));
        assert_eq!(workflows[0].active, Some(false));
        assert_eq!(workflows[1].id.as_deref(), Some("a1B2"));
    }
}
