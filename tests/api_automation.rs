// HTTP-level tests for the automation routes, with Flowise and n8n mocked
mod common;

use axum::http::StatusCode;
use common::{app, base_config, get, post, token, USER_ID};
use saas_forge::{AppConfig, FlowiseConfig, N8nConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn with_flowise(server: &MockServer) -> AppConfig {
    let mut config = base_config();
    config.automation.flowise = Some(FlowiseConfig {
        base_url: server.uri(),
        api_key: Some("fw-key".to_string()),
        chatflow_id: Some("cf-1".to_string()),
    });
    config
}

fn with_n8n(server: &MockServer) -> AppConfig {
    let mut config = base_config();
    config.automation.n8n = Some(N8nConfig {
        base_url: server.uri(),
        api_key: Some("n8n-key".to_string()),
        webhook_url: None,
    });
    config
}

#[tokio::test]
async fn unconfigured_backends_are_503() {
    let flowise = get(app(base_config()), "/api/automation/flowise", Some(&token())).await;
    assert_eq!(flowise.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(flowise.body, json!({"error": "Flowise service not configured"}));

    let n8n = get(app(base_config()), "/api/automation/n8n", Some(&token())).await;
    assert_eq!(n8n.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(n8n.body, json!({"error": "n8n service not configured"}));
}

#[tokio::test]
async fn action_is_required_before_configuration_check() {
    let response = post(
        app(base_config()),
        "/api/automation/n8n",
        Some(&token()),
        json!({"params": {}}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"error": "Action is required"}));
}

#[tokio::test]
async fn list_chatflows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chatflows"))
        .and(header("authorization", "Bearer fw-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "cf-1", "name": "Support bot", "deployed": true}
        ])))
        .mount(&server)
        .await;

    let response = get(app(with_flowise(&server)), "/api/automation/flowise", Some(&token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"][0]["name"], "Support bot");
}

#[tokio::test]
async fn list_failure_is_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let response = get(
        app(with_n8n(&server)),
        "/api/automation/n8n/workflows",
        Some(&token()),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn flowise_chat_defaults_session_to_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/prediction/cf-1"))
        .and(body_partial_json(json!({
            "question": "What are your hours?",
            "history": [],
            "overrideConfig": {},
            "socketIOClientId": format!("user-{}", USER_ID)
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "9 to 5"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = post(
        app(with_flowise(&server)),
        "/api/automation/flowise/chat",
        Some(&token()),
        json!({"message": "What are your hours?"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!({"text": "9 to 5"}));
}

#[tokio::test]
async fn flowise_chat_requires_message() {
    let response = post(
        app(base_config()),
        "/api/automation/flowise/chat",
        Some(&token()),
        json!({"sessionId": "s-1"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Message is required");
}

#[tokio::test]
async fn flowise_unknown_action_is_reported_in_result() {
    let server = MockServer::start().await;

    let response = post(
        app(with_flowise(&server)),
        "/api/automation/flowise",
        Some(&token()),
        json!({"action": "rebootServer"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "Unknown Flowise action: rebootServer");
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn n8n_action_get_executions_filters_by_workflow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/executions"))
        .and(wiremock::matchers::query_param("filter", r#"{"workflowId":"wf-9"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "ex-1", "finished": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = post(
        app(with_n8n(&server)),
        "/api/automation/n8n",
        Some(&token()),
        json!({"action": "getExecutions", "params": {"workflowId": "wf-9"}}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"], json!([{"id": "ex-1", "finished": true}]));
}

#[tokio::test]
async fn create_workflow_requires_name_and_sends_defaults() {
    let missing = post(
        app(base_config()),
        "/api/automation/n8n/workflows",
        Some(&token()),
        json!({"nodes": []}),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "Workflow name is required");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows"))
        .and(header("X-N8N-API-KEY", "n8n-key"))
        .and(body_partial_json(json!({
            "name": "Lead sync",
            "nodes": [],
            "connections": {},
            "active": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wf-1",
            "name": "Lead sync",
            "active": false,
            "nodes": [],
            "connections": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = post(
        app(with_n8n(&server)),
        "/api/automation/n8n/workflows",
        Some(&token()),
        json!({"name": "Lead sync"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["data"]["id"], "wf-1");
}

#[tokio::test]
async fn execute_workflow_normalises_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf-1/execute"))
        .and(body_partial_json(json!({"data": {"lead": "ada@example.com"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "exec-77", "finished": true, "mode": "manual"}
        })))
        .mount(&server)
        .await;

    let response = post(
        app(with_n8n(&server)),
        "/api/automation/n8n/execute",
        Some(&token()),
        json!({"workflowId": "wf-1", "data": {"lead": "ada@example.com"}}),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["executionId"], "exec-77");
    assert_eq!(response.body["data"]["mode"], "manual");
}

#[tokio::test]
async fn execute_workflow_upstream_error_is_500_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf-404/execute"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = post(
        app(with_n8n(&server)),
        "/api/automation/n8n/execute",
        Some(&token()),
        json!({"workflowId": "wf-404"}),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "n8n API error: Not Found"})
    );
}

#[tokio::test]
async fn execute_requires_workflow_id() {
    let response = post(
        app(base_config()),
        "/api/automation/n8n/execute",
        Some(&token()),
        json!({"data": {}}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Workflow ID is required");
}

#[tokio::test]
async fn health_reports_each_backend_independently() {
    let flowise = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chatflows"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&flowise)
        .await;

    let n8n = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&n8n)
        .await;

    let mut config = with_flowise(&flowise);
    config.automation.n8n = with_n8n(&n8n).automation.n8n;

    let response = get(app(config), "/api/automation/health", Some(&token())).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["services"], json!({"flowise": true, "n8n": true}));
    assert_eq!(data["health"]["flowise"], false);
    assert_eq!(data["health"]["n8n"], true);
    assert_eq!(
        data["health"]["errors"],
        json!(["Flowise health check failed: Flowise API error: Internal Server Error"])
    );
}
