// Client-level tests for provider and automation backends against mock servers
use saas_forge::automation::flowise::FlowiseFlow;
use saas_forge::llm::providers::{AnthropicConfig, OpenAIConfig};
use saas_forge::{
    AIProvider, AnthropicClient, AutomationConfig, AutomationKind, AutomationService,
    FlowiseConfig, FlowiseService, GenerationOptions, LLMError, N8nConfig, N8nService,
    OpenAIClient, WorkflowType,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(OpenAIConfig {
        api_key: "sk-test".to_string(),
        base_url: server.uri(),
        ..OpenAIConfig::default()
    })
}

fn anthropic(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(AnthropicConfig {
        api_key: "ak-test".to_string(),
        base_url: server.uri(),
        ..AnthropicConfig::default()
    })
}

#[tokio::test]
async fn openai_sends_system_prompt_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 256,
            "messages": [{"role": "system"}, {"role": "user", "content": "a button"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "<Button />"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GenerationOptions {
        temperature: Some(0.5),
        max_tokens: Some(256),
        model: Some("gpt-4o-mini".to_string()),
    };
    let code = openai(&server).generate_code("a button", &options).await.unwrap();
    assert_eq!(code, "<Button />");
}

#[tokio::test]
async fn openai_empty_reply_becomes_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c2",
            "model": "gpt-4",
            "choices": []
        })))
        .mount(&server)
        .await;

    let structure = openai(&server).generate_structure("anything").await.unwrap();
    assert_eq!(structure, json!({}));
}

#[tokio::test]
async fn openai_rate_limit_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}
        })))
        .mount(&server)
        .await;

    let err = openai(&server)
        .generate_code("x", &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::RateLimitExceeded(ref msg) if msg == "Rate limit reached"));
}

#[tokio::test]
async fn anthropic_workflow_fallback_carries_type_and_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ak-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "model": "claude-3-5-sonnet-20241022",
            "content": [{"type": "text", "text": "Here you go: nodes..."}],
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;

    let workflow = anthropic(&server)
        .generate_workflow("answer support tickets", WorkflowType::Flowise)
        .await
        .unwrap();

    assert_eq!(workflow["error"], "Invalid JSON response");
    assert_eq!(workflow["rawResponse"], "Here you go: nodes...");
    assert_eq!(workflow["type"], "flowise");
    assert_eq!(workflow["description"], "answer support tickets");
}

#[tokio::test]
async fn flowise_crud_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/chatflows/cf-1"))
        .and(body_partial_json(json!({"name": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cf-1", "name": "Renamed", "isPublic": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/chatflows/cf-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"affected": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let service = FlowiseService::new(FlowiseConfig::new(server.uri()));
    let update = FlowiseFlow {
        name: Some("Renamed".to_string()),
        ..FlowiseFlow::default()
    };

    let updated = service.update_chatflow("cf-1", &update).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("Renamed"));
    assert_eq!(updated.extra.get("isPublic"), Some(&json!(true)));

    service.delete_chatflow("cf-1").await.unwrap();
}

#[tokio::test]
async fn n8n_activation_toggles_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf-1/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf-1", "active": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/wf-1/deactivate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "wf-1", "active": false})))
        .expect(1)
        .mount(&server)
        .await;

    let service = N8nService::new(N8nConfig::new(server.uri()));
    assert_eq!(service.set_workflow_active("wf-1", true).await.unwrap().active, Some(true));
    assert_eq!(service.set_workflow_active("wf-1", false).await.unwrap().active, Some(false));
}

#[tokio::test]
async fn send_message_action_forwards_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/prediction/cf-7"))
        .and(body_partial_json(json!({
            "question": "hello",
            "socketIOClientId": "session-1",
            "overrideConfig": {"temperature": 0.1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = AutomationService::new(AutomationConfig {
        flowise: Some(FlowiseConfig {
            base_url: server.uri(),
            api_key: None,
            chatflow_id: Some("cf-7".to_string()),
        }),
        n8n: None,
    });

    let result = service
        .execute_automation(
            AutomationKind::Flowise,
            "sendMessage",
            &json!({
                "message": "hello",
                "options": {"sessionId": "session-1", "overrideConfig": {"temperature": 0.1}}
            }),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.data, Some(json!({"text": "hi there"})));
}

#[tokio::test]
async fn backend_failure_becomes_unsuccessful_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = AutomationService::new(AutomationConfig {
        flowise: None,
        n8n: Some(N8nConfig::new(server.uri())),
    });

    let result = service
        .execute_automation(AutomationKind::N8n, "getWorkflows", &json!({}))
        .await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("n8n API error: Service Unavailable"));
}

#[tokio::test]
async fn n8n_numeric_workflow_ids_keep_health_green() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "name": "wf", "active": false}]
        })))
        .mount(&server)
        .await;

    let service = AutomationService::new(AutomationConfig {
        flowise: None,
        n8n: Some(N8nConfig::new(server.uri())),
    });

    let health = service.health_check().await;
    assert!(health.n8n);
    assert!(health.errors.is_empty());

    let workflows = service.n8n_service().unwrap().get_workflows().await.unwrap();
    assert_eq!(workflows[0].id.as_deref(), Some("1"));
}

#[tokio::test]
async fn n8n_null_data_lists_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let service = AutomationService::new(AutomationConfig {
        flowise: None,
        n8n: Some(N8nConfig::new(server.uri())),
    });

    let result = service
        .execute_automation(AutomationKind::N8n, "getWorkflows", &json!({}))
        .await;
    assert!(result.success);
    assert_eq!(result.data, Some(json!([])));
}
