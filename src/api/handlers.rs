// REST handlers for AI generation, chat, queue status and service health

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info};

use super::auth::AuthenticatedUser;
use super::types::{
    json_body, present, ApiError, ApiResponse, ChatRequest, ChatResponse, GenerateRequest,
    SaasRequest, WorkflowRequest,
};
use super::AppState;
use crate::chat::{generate_simple_response, UsageContext, UsageKind, UsageTracker};
use crate::llm::{
    service::{create_ai_service, DEFAULT_PROVIDER},
    GenerationType, WorkflowType,
};
use crate::queue::{queue_health, track_analytics, QueueOverview};

/// Workspace used until users can select one
const DEFAULT_WORKSPACE: &str = "default";

/// Generate code - POST /api/ai/generate
pub async fn generate_code(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let request = json_body(payload)?;

    let (kind, specification) = match (present(request.kind), present(request.specification)) {
        (Some(kind), Some(specification)) => (kind, specification),
        _ => {
            return Err(ApiError::BadRequest(
                "Type and specification are required".to_string(),
            ))
        }
    };

    let generation_type: GenerationType = kind.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid type. Must be one of: {}",
            GenerationType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    let provider = present(request.provider).unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    info!("User {} requested {} generation via {}", user.user_id, kind, provider);

    let service = create_ai_service(&state.config.providers);
    let result = service
        .generate_code(generation_type, &specification, Some(&provider), &request.options)
        .await
        .map_err(|e| {
            error!("AI generation error: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ApiResponse::new(json!({
        "type": kind,
        "provider": provider,
        "result": result,
        "specification": specification,
        "options": request.options,
    }))))
}

/// Generate a SaaS application specification - POST /api/ai/saas
pub async fn generate_saas(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<SaasRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let request = json_body(payload)?;

    let (name, description) = match (present(request.name), present(request.description)) {
        (Some(name), Some(description)) => (name, description),
        _ => {
            return Err(ApiError::BadRequest(
                "Name and description are required".to_string(),
            ))
        }
    };

    let provider = present(request.provider).unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    info!("User {} requested SaaS spec {} via {}", user.user_id, name, provider);

    let service = create_ai_service(&state.config.providers);
    let specification = service
        .generate_saas_application(&name, &description, &request.features, Some(&provider))
        .await
        .map_err(|e| {
            error!("AI SaaS generation error: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ApiResponse::new(json!({
        "name": name,
        "description": description,
        "features": request.features,
        "provider": provider,
        "specification": specification,
    }))))
}

/// Generate an automation workflow - POST /api/ai/workflows
pub async fn generate_workflow(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<WorkflowRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let request = json_body(payload)?;

    let (description, kind) = match (present(request.description), present(request.kind)) {
        (Some(description), Some(kind)) => (description, kind),
        _ => {
            return Err(ApiError::BadRequest(
                "Description and type are required".to_string(),
            ))
        }
    };

    let workflow_type: WorkflowType = kind.parse().map_err(|_| {
        ApiError::BadRequest(r#"Type must be either "n8n" or "flowise""#.to_string())
    })?;

    let provider = present(request.provider).unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    info!("User {} requested {} workflow via {}", user.user_id, workflow_type, provider);

    let service = create_ai_service(&state.config.providers);
    let workflow = service
        .generate_workflow(&description, workflow_type, Some(&provider))
        .await
        .map_err(|e| {
            error!("AI workflow generation error: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ApiResponse::new(json!({
        "description": description,
        "type": workflow_type,
        "provider": provider,
        "workflow": workflow,
    }))))
}

fn properties(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Simulated chat - POST /api/ai/chat
pub async fn chat(
    user: AuthenticatedUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = payload.map(|Json(body)| body).map_err(|rejection| {
        ApiError::InvalidFormat(vec![json!({ "path": [], "message": rejection.body_text() })])
    })?;

    let problems = request.validate();
    if !problems.is_empty() {
        return Err(ApiError::InvalidFormat(problems));
    }

    let context = UsageContext {
        workspace_id: DEFAULT_WORKSPACE.to_string(),
        user_id: Some(user.user_id.clone()),
        kind: UsageKind::Chat,
    };

    let tracker = UsageTracker::new();
    let limits = tracker.check_limits().await;
    debug!("Usage remaining for {}: {}", user.user_id, limits.remaining);

    track_analytics(
        "ai_chat_requested",
        &user.user_id,
        DEFAULT_WORKSPACE,
        properties(json!({
            "model": request.model,
            "messageLength": request.message.chars().count(),
            "stream": request.stream,
        })),
    )
    .await;

    let response = generate_simple_response(&request.message, &context).await;
    tracker
        .log_usage(&context, response.usage.total_tokens, response.cost)
        .await;

    track_analytics(
        "ai_chat_completed",
        &user.user_id,
        DEFAULT_WORKSPACE,
        properties(json!({
            "model": request.model,
            "tokensUsed": response.usage.total_tokens,
            "cost": response.cost,
        })),
    )
    .await;

    Ok(Json(ChatResponse {
        response: response.text,
        usage: response.usage,
        cost: response.cost,
    }))
}

/// Queue overview - GET /api/queue/status
pub async fn queue_status(_user: AuthenticatedUser) -> impl IntoResponse {
    let queues = queue_health().await;
    let overall = QueueOverview::from_stats(&queues);

    Json(json!({
        "overall": overall,
        "queues": queues,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime: f64,
    pub environment: String,
    pub checks: BTreeMap<&'static str, HealthCheck>,
}

impl HealthReport {
    fn status_for(checks: &BTreeMap<&'static str, HealthCheck>) -> HealthStatus {
        if checks.values().any(|check| check.status == "disconnected") {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Liveness report - GET /api/health (unauthenticated)
pub async fn health_check(State(state): State<AppState>) -> Response {
    let started = Instant::now();

    let mut checks = BTreeMap::new();
    if state.config.health.database_url.is_some() {
        checks.insert("database", HealthCheck { status: "connected" });
    }
    if state.config.health.redis_url.is_some() {
        checks.insert("redis", HealthCheck { status: "connected" });
    }
    checks.insert("api", HealthCheck { status: "operational" });

    let report = HealthReport {
        status: HealthReport::status_for(&checks),
        timestamp: crate::iso_timestamp(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.server.environment.clone(),
        checks,
    };

    let code = if report.status == HealthStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut response = (code, Json(report)).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", started.elapsed().as_millis())) {
        headers.insert("X-Response-Time", value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_check_degrades_status() {
        let mut checks = BTreeMap::new();
        checks.insert("api", HealthCheck { status: "operational" });
        assert_eq!(HealthReport::status_for(&checks), HealthStatus::Healthy);

        checks.insert("redis", HealthCheck { status: "disconnected" });
        assert_eq!(HealthReport::status_for(&checks), HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_health_headers() {
        let response = health_check(State(AppState::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-Response-Time"));
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "no-store, no-cache, must-revalidate"
        );
    }
}
