// REST API module
// Authenticated JSON routes over the AI providers, the automation backends,
// the simulated chat and the queue stub

pub mod auth;
pub mod automation;
pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use automation::{
    automation_health, create_workflow, execute_workflow, flowise_action, flowise_chat,
    list_chatflows, list_workflows, n8n_action,
};
use handlers::{chat, generate_code, generate_saas, generate_workflow, health_check, queue_status};

/// Shared, read-only state handed to every handler.
///
/// Services are built from `config` per request; nothing here mutates.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Listener configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub port: u16,
    pub host: String,
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: crate::config::DEFAULT_PORT,
            host: crate::config::DEFAULT_HOST.to_string(),
            cors_enabled: true,
        }
    }
}

pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, app_config: AppConfig) -> Self {
        Self {
            config,
            state: AppState::new(app_config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Create the Axum router with every route
    pub fn create_router(&self) -> Router {
        create_router(self.state.clone(), self.config.cors_enabled)
    }

    /// Run the server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.create_router();
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!("SaaS Forge API server starting");
        info!("Server address: http://{}", addr);
        info!("Environment: {}", self.state.config.server.environment);
        info!(
            "AI providers: openai={} anthropic={}",
            self.state.config.providers.openai.is_some(),
            self.state.config.providers.anthropic.is_some()
        );
        info!(
            "Automation: flowise={} n8n={}",
            self.state.config.automation.flowise.is_some(),
            self.state.config.automation.n8n.is_some()
        );
        if !self.state.config.auth.is_configured() {
            warn!("No CLERK_JWT_KEY or AUTH_JWT_SECRET set; authenticated routes will return 401");
        }

        axum::Server::bind(&addr.parse()?)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

/// Build the application router over `state`
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let router = Router::new()
        // AI generation
        .route("/api/ai/generate", post(generate_code))
        .route("/api/ai/saas", post(generate_saas))
        .route("/api/ai/workflows", post(generate_workflow))
        .route("/api/ai/chat", post(chat))
        // Automation
        .route("/api/automation/flowise", get(list_chatflows).post(flowise_action))
        .route("/api/automation/flowise/chat", post(flowise_chat))
        .route("/api/automation/n8n", get(list_workflows).post(n8n_action))
        .route(
            "/api/automation/n8n/workflows",
            get(list_workflows).post(create_workflow),
        )
        .route("/api/automation/n8n/execute", post(execute_workflow))
        .route("/api/automation/health", get(automation_health))
        // Operations
        .route("/api/queue/status", get(queue_status))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Builder pattern for the API server
pub struct ApiServerBuilder {
    config: ApiConfig,
    app_config: AppConfig,
}

impl ApiServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            app_config: AppConfig::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.config.host = host;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Use `app_config`, taking host and port from its server section
    pub fn with_app_config(mut self, app_config: AppConfig) -> Self {
        self.config.host = app_config.server.host.clone();
        self.config.port = app_config.server.port;
        self.app_config = app_config;
        self
    }

    pub fn build(self) -> ApiServer {
        ApiServer::new(self.config, self.app_config)
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Server configured entirely from the environment
pub fn create_default_server() -> ApiServer {
    ApiServerBuilder::new()
        .with_app_config(AppConfig::from_env())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_builder_pattern() {
        let server = ApiServerBuilder::new()
            .with_port(8080)
            .with_host("127.0.0.1".to_string())
            .with_cors(false)
            .build();

        assert_eq!(server.config().port, 8080);
        assert_eq!(server.config().host, "127.0.0.1");
        assert!(!server.config().cors_enabled);
    }

    #[test]
    fn test_app_config_supplies_listener() {
        let mut app_config = AppConfig::default();
        app_config.server.port = 4100;
        let server = ApiServerBuilder::new().with_app_config(app_config).build();
        assert_eq!(server.config().port, 4100);
    }

    #[tokio::test]
    async fn test_health_endpoint_needs_no_auth() {
        let app = ApiServerBuilder::new().build().create_router();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_queue_status_requires_auth() {
        let app = ApiServerBuilder::new().build().create_router();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/queue/status")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
