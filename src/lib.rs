// SaaS Forge - Rust Edition
// An authenticated JSON gateway over LLM providers and workflow-automation backends

//! # SaaS Forge Library
//!
//! This is the library crate behind the `server` and `admin` binaries. It wires
//! large-language-model providers (OpenAI, Anthropic) and workflow-automation
//! backends (Flowise, n8n) behind one HTTP API.
//!
//! ## Core Components
//!
//! ### AI generation
//! - [`AIProvider`]: the flat capability surface every LLM backend implements
//!   (code, structured JSON, importable workflows)
//! - [`AIService`]: a name-keyed registry that routes a request to the provider
//!   the caller asked for
//!
//! ### Automation
//! - [`AutomationService`]: composes the Flowise and n8n backends that are
//!   configured, exposes a string-keyed action dispatcher and an aggregate
//!   health check
//!
//! ### HTTP API
//! - [`ApiServer`] / [`ApiServerBuilder`]: the axum application
//!
//! Registries and services are built fresh for every inbound request from the
//! process [`AppConfig`]; nothing here is shared mutable state.
//!
//! **Usage Example:**
//! ```rust,no_run
//! use saas_forge::{create_ai_service, GenerationOptions, GenerationType, ProviderSettings};
//!
//! # async fn demo() -> saas_forge::Result<()> {
//! let settings = ProviderSettings::from_env();
//! let service = create_ai_service(&settings);
//! let code = service
//!     .generate_code(GenerationType::Component, "a button", None, &GenerationOptions::default())
//!     .await?;
//! println!("{}", code);
//! # Ok(())
//! # }
//! ```

// Outbound HTTP helpers shared by providers and automation backends
pub mod http;

// Environment-derived configuration
pub mod config;

// LLM providers, prompts and the provider registry
pub mod llm;

// Flowise / n8n integration
pub mod automation;

// Simulated chat responses and usage tracking
pub mod chat;

// Logging stand-in for the background job queue
pub mod queue;

// REST API served by the `server` binary
pub mod api;

pub use config::{AppConfig, AuthConfig, ServerConfig};

pub use llm::{
    providers::{AnthropicClient, OpenAIClient},
    service::{create_ai_service, AIService, ProviderSettings},
    traits::AIProvider,
    GenerationOptions, GenerationType, LLMError, LLMProviderType, LLMResult, WorkflowType,
};

pub use automation::{
    flowise::{FlowiseConfig, FlowiseService},
    n8n::{N8nConfig, N8nService},
    AutomationConfig, AutomationError, AutomationHealth, AutomationKind, AutomationResult,
    AutomationService, AvailableServices,
};

pub use api::{create_default_server, ApiConfig, ApiServer, ApiServerBuilder, AppState};

use thiserror::Error;

/// Top-level error type for SaaS Forge operations
///
/// Each layer keeps its own error enum ([`LLMError`], [`AutomationError`]);
/// this type lets callers that span layers, such as the `admin` binary, use a
/// single `Result` with `?`.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Errors raised by an LLM provider or the provider registry
    #[error(transparent)]
    LLM(#[from] LLMError),

    /// Errors raised by an automation backend
    #[error(transparent)]
    Automation(#[from] AutomationError),

    /// Error when invalid input is provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Current UTC time as an ISO-8601 string with millisecond precision
/// (`2024-05-01T12:00:00.000Z`)
pub fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
