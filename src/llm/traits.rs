//! Common trait for LLM providers
//! This module defines the interface every provider client implements, so
//! callers never branch on which backend is active.

use async_trait::async_trait;
use serde_json::Value;

use super::{GenerationOptions, LLMProviderType, LLMResult, WorkflowType};

/// Core trait that all LLM provider clients must implement
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Registry key for this provider ("openai", "anthropic", ...)
    fn name(&self) -> &str;

    /// Get the provider type
    fn provider_type(&self) -> LLMProviderType;

    /// Generate source code for a free-text prompt.
    ///
    /// Returns the first text completion, or an empty string if the backend
    /// returned none.
    async fn generate_code(&self, prompt: &str, options: &GenerationOptions) -> LLMResult<String>;

    /// Generate a JSON document for a free-text prompt.
    ///
    /// A reply that is not valid JSON is returned as the
    /// `{"error": "Invalid JSON response", "rawResponse": ...}` fallback, not
    /// as an error.
    async fn generate_structure(&self, prompt: &str) -> LLMResult<Value>;

    /// Generate an importable workflow document for the given backend
    async fn generate_workflow(
        &self,
        description: &str,
        workflow_type: WorkflowType,
    ) -> LLMResult<Value>;
}
