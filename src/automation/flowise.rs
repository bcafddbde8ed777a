//! Flowise client
//!
//! Chat predictions against a configured chatflow plus CRUD passthrough to
//! `/api/v1/chatflows`. Every non-2xx reply becomes
//! `Flowise API error: <status text>`.

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{send_checked, AutomationError, BackendResult};
use crate::http::build_client;

const BACKEND: &str = "Flowise";

/// Connection settings for a Flowise instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowiseConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Chatflow used by [`FlowiseService::send_message`]
    pub chatflow_id: Option<String>,
}

impl FlowiseConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            chatflow_id: None,
        }
    }
}

/// Per-message options for a chatflow prediction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOptions {
    pub session_id: Option<String>,
    pub override_config: Option<Value>,
    pub chat_id: Option<String>,
}

/// A Flowise chatflow. Every field is optional so the same type serves as
/// a partial update; fields this crate does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowiseFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Serialized node graph, as Flowise stores it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatbot_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HTTP client for one Flowise instance
#[derive(Debug, Clone)]
pub struct FlowiseService {
    client: Client,
    config: FlowiseConfig,
}

impl FlowiseService {
    pub fn new(config: FlowiseConfig) -> Self {
        Self {
            client: build_client(None),
            config,
        }
    }

    pub fn config(&self) -> &FlowiseConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("Flowise request: {} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.config.api_key {
            Some(api_key) => builder.bearer_auth(api_key),
            None => builder,
        }
    }

    /// Send a message to the configured chatflow and return the prediction
    pub async fn send_message(
        &self,
        message: &str,
        options: &SendMessageOptions,
    ) -> BackendResult<Value> {
        let chatflow_id = self.config.chatflow_id.as_deref().ok_or_else(|| {
            AutomationError::NotConfigured("Flowise chatflow ID not configured".to_string())
        })?;

        let body = json!({
            "question": message,
            "history": [],
            "overrideConfig": options.override_config.clone().unwrap_or_else(|| json!({})),
            "socketIOClientId": options.session_id,
            "chatId": options.chat_id,
        });

        let response = send_checked(
            BACKEND,
            self.request(Method::POST, &format!("/api/v1/prediction/{}", chatflow_id))
                .json(&body),
        )
        .await?;

        response
            .json()
            .await
            .map_err(|e| AutomationError::Serialization(e.to_string()))
    }

    /// List available chatflows
    pub async fn get_chatflows(&self) -> BackendResult<Vec<FlowiseFlow>> {
        let response = send_checked(BACKEND, self.request(Method::GET, "/api/v1/chatflows")).await?;

        response
            .json()
            .await
            .map_err(|e| AutomationError::Serialization(e.to_string()))
    }

    pub async fn create_chatflow(&self, flow: &FlowiseFlow) -> BackendResult<FlowiseFlow> {
        let response = send_checked(
            BACKEND,
            self.request(Method::POST, "/api/v1/chatflows").json(flow),
        )
        .await?;

        response
            .json()
            .await
            .map_err(|e| AutomationError::Serialization(e.to_string()))
    }

    pub async fn update_chatflow(&self, id: &str, flow: &FlowiseFlow) -> BackendResult<FlowiseFlow> {
        let response = send_checked(
            BACKEND,
            self.request(Method::PUT, &format!("/api/v1/chatflows/{}", id))
                .json(flow),
        )
        .await?;

        response
            .json()
            .await
            .map_err(|e| AutomationError::Serialization(e.to_string()))
    }

    pub async fn delete_chatflow(&self, id: &str) -> BackendResult<()> {
        send_checked(
            BACKEND,
            self.request(Method::DELETE, &format!("/api/v1/chatflows/{}", id)),
        )
        .await?;
        Ok(())
    }
}
