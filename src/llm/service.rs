//! AI service: a name-keyed registry of LLM providers
//!
//! A service is built per request from whichever API keys are configured.
//! A provider whose key is absent is simply not registered; asking for it
//! fails with [`LLMError::ProviderNotConfigured`].

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{
    prompts::{code_prompt, saas_prompt},
    providers::{AnthropicClient, AnthropicConfig, OpenAIClient, OpenAIConfig},
    traits::AIProvider,
    GenerationOptions, GenerationType, LLMError, LLMProviderType, LLMResult, WorkflowType,
};

/// Provider used when the caller does not name one
pub const DEFAULT_PROVIDER: &str = "openai";

/// Per-provider settings; `None` means the provider's key is not configured
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub openai: Option<OpenAIConfig>,
    pub anthropic: Option<AnthropicConfig>,
}

impl ProviderSettings {
    /// Read `OPENAI_*` and `ANTHROPIC_*` variables
    pub fn from_env() -> Self {
        Self {
            openai: OpenAIConfig::from_env(),
            anthropic: AnthropicConfig::from_env(),
        }
    }

    pub fn is_configured(&self, provider: LLMProviderType) -> bool {
        match provider {
            LLMProviderType::OpenAI => self.openai.is_some(),
            LLMProviderType::Anthropic => self.anthropic.is_some(),
        }
    }
}

/// Registry that routes generation requests to a provider by name
#[derive(Default)]
pub struct AIService {
    providers: HashMap<String, Box<dyn AIProvider>>,
}

impl AIService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its name; a later registration replaces an
    /// earlier one with the same name.
    pub fn add_provider(&mut self, provider: Box<dyn AIProvider>) {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            debug!("Replaced AI provider registration: {}", name);
        }
    }

    pub fn get_provider(&self, name: &str) -> Option<&dyn AIProvider> {
        self.providers.get(name).map(|provider| provider.as_ref())
    }

    /// Registered provider names, sorted
    pub fn available_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    fn resolve(&self, preferred: Option<&str>) -> LLMResult<&dyn AIProvider> {
        let name = preferred.unwrap_or(DEFAULT_PROVIDER);
        self.get_provider(name)
            .ok_or_else(|| LLMError::ProviderNotConfigured(name.to_string()))
    }

    /// Generate code of the given kind from a free-text specification
    pub async fn generate_code(
        &self,
        kind: GenerationType,
        specification: &str,
        preferred_provider: Option<&str>,
        options: &GenerationOptions,
    ) -> LLMResult<String> {
        let provider = self.resolve(preferred_provider)?;
        info!("Generating {} with provider {}", kind, provider.name());
        provider
            .generate_code(&code_prompt(kind, specification), options)
            .await
    }

    /// Generate an importable workflow document for n8n or Flowise
    pub async fn generate_workflow(
        &self,
        description: &str,
        workflow_type: WorkflowType,
        preferred_provider: Option<&str>,
    ) -> LLMResult<Value> {
        let provider = self.resolve(preferred_provider)?;
        info!("Generating {} workflow with provider {}", workflow_type, provider.name());
        provider.generate_workflow(description, workflow_type).await
    }

    /// Generate a full SaaS application specification as structured JSON
    pub async fn generate_saas_application(
        &self,
        name: &str,
        description: &str,
        features: &[String],
        preferred_provider: Option<&str>,
    ) -> LLMResult<Value> {
        let provider = self.resolve(preferred_provider)?;
        info!(
            "Generating SaaS specification for {} ({} features) with provider {}",
            name,
            features.len(),
            provider.name()
        );
        provider
            .generate_structure(&saas_prompt(name, description, features))
            .await
    }
}

/// Build a service holding one client per configured provider
pub fn create_ai_service(settings: &ProviderSettings) -> AIService {
    let mut service = AIService::new();

    if let Some(config) = &settings.openai {
        service.add_provider(Box::new(OpenAIClient::new(config.clone())));
    }

    if let Some(config) = &settings.anthropic {
        service.add_provider(Box::new(AnthropicClient::new(config.clone())));
    }

    service
}
