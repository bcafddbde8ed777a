// REST handlers for the Flowise and n8n automation backends

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use super::auth::AuthenticatedUser;
use super::types::{
    json_body, present, ActionRequest, ApiError, ApiResponse, CreateWorkflowRequest,
    ExecuteWorkflowRequest, FlowiseChatRequest,
};
use super::AppState;
use crate::automation::{
    flowise::{FlowiseService, SendMessageOptions},
    n8n::{N8nService, N8nWorkflow},
    AutomationKind, AutomationResult, AutomationService,
};

fn automation_service(state: &AppState) -> AutomationService {
    AutomationService::new(state.config.automation.clone())
}

fn flowise_or_503(service: &AutomationService) -> Result<&FlowiseService, ApiError> {
    service
        .flowise_service()
        .ok_or_else(|| ApiError::ServiceUnavailable("Flowise service not configured".to_string()))
}

fn n8n_or_503(service: &AutomationService) -> Result<&N8nService, ApiError> {
    service
        .n8n_service()
        .ok_or_else(|| ApiError::ServiceUnavailable("n8n service not configured".to_string()))
}

/// Validate `{action, params}` and dispatch it to one backend
async fn dispatch_action(
    state: &AppState,
    kind: AutomationKind,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<AutomationResult>, ApiError> {
    let request = json_body(payload)?;
    let action = present(request.action)
        .ok_or_else(|| ApiError::BadRequest("Action is required".to_string()))?;

    let service = automation_service(state);
    match kind {
        AutomationKind::Flowise => {
            flowise_or_503(&service)?;
        }
        AutomationKind::N8n => {
            n8n_or_503(&service)?;
        }
    }

    let params = request
        .params
        .filter(|p| !p.is_null())
        .unwrap_or_else(|| json!({}));
    Ok(Json(service.execute_automation(kind, &action, &params).await))
}

/// List chatflows - GET /api/automation/flowise
pub async fn list_chatflows(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let service = automation_service(&state);
    let flowise = flowise_or_503(&service)?;

    let chatflows = flowise.get_chatflows().await.map_err(|e| {
        error!("Flowise API error: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(ApiResponse::new(json!(chatflows))))
}

/// Run a Flowise action - POST /api/automation/flowise
pub async fn flowise_action(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<AutomationResult>, ApiError> {
    dispatch_action(&state, AutomationKind::Flowise, payload).await
}

/// Chat with the configured chatflow - POST /api/automation/flowise/chat
pub async fn flowise_chat(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<FlowiseChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let request = json_body(payload)?;
    let message = present(request.message)
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let service = automation_service(&state);
    let flowise = flowise_or_503(&service)?;

    let options = SendMessageOptions {
        session_id: Some(
            present(request.session_id).unwrap_or_else(|| format!("user-{}", user.user_id)),
        ),
        override_config: request.override_config,
        chat_id: None,
    };

    let reply = flowise.send_message(&message, &options).await.map_err(|e| {
        error!("Flowise chat error: {}", e);
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(ApiResponse::new(reply)))
}

/// List workflows - GET /api/automation/n8n and GET /api/automation/n8n/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let service = automation_service(&state);
    let n8n = n8n_or_503(&service)?;

    let workflows = n8n.get_workflows().await.map_err(|e| {
        error!("n8n API error: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(ApiResponse::new(json!(workflows))))
}

/// Run an n8n action - POST /api/automation/n8n
pub async fn n8n_action(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<AutomationResult>, ApiError> {
    dispatch_action(&state, AutomationKind::N8n, payload).await
}

/// Create a workflow - POST /api/automation/n8n/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateWorkflowRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let request = json_body(payload)?;
    let name = present(request.name)
        .ok_or_else(|| ApiError::BadRequest("Workflow name is required".to_string()))?;

    let service = automation_service(&state);
    let n8n = n8n_or_503(&service)?;

    let mut extra = Map::new();
    if let Some(description) = request.description {
        extra.insert("description".to_string(), Value::String(description));
    }

    let workflow = N8nWorkflow {
        name: Some(name),
        active: Some(request.active),
        nodes: Some(request.nodes.unwrap_or_default()),
        connections: Some(request.connections.unwrap_or_else(|| json!({}))),
        extra,
        ..N8nWorkflow::default()
    };

    let created = n8n.create_workflow(&workflow).await.map_err(|e| {
        error!("n8n create workflow error: {}", e);
        ApiError::Upstream(e.to_string())
    })?;
    info!("User {} created n8n workflow {:?}", user.user_id, created.id);

    Ok(Json(ApiResponse::new(json!(created))))
}

/// Execute a workflow - POST /api/automation/n8n/execute
pub async fn execute_workflow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<ExecuteWorkflowRequest>, JsonRejection>,
) -> Result<Json<AutomationResult>, ApiError> {
    let request = json_body(payload)?;
    let workflow_id = present(request.workflow_id)
        .ok_or_else(|| ApiError::BadRequest("Workflow ID is required".to_string()))?;

    let service = automation_service(&state);
    let n8n = n8n_or_503(&service)?;

    info!("User {} executing n8n workflow {}", user.user_id, workflow_id);
    let result = n8n
        .execute_workflow(&workflow_id, request.data.filter(|d| !d.is_null()))
        .await
        .map_err(|e| {
            error!("n8n execute workflow error: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    Ok(Json(result))
}

/// Configuration and reachability of both backends - GET /api/automation/health
pub async fn automation_health(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<Value> {
    let service = automation_service(&state);
    let health = service.health_check().await;

    Json(json!({
        "success": true,
        "data": {
            "services": service.available_services(),
            "health": health,
            "timestamp": crate::iso_timestamp(),
        }
    }))
}
