//! OpenAI provider configuration
//! This module contains configuration structures and defaults specific to OpenAI

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Sampling temperature used when the caller does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Token budget for code generation
pub const CODE_MAX_TOKENS: u32 = 4000;
/// Token budget for structured-JSON generation
pub const STRUCTURE_MAX_TOKENS: u32 = 3000;
/// Token budget for workflow generation
pub const WORKFLOW_MAX_TOKENS: u32 = 4000;

/// OpenAI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for API requests
    pub base_url: String,
    /// Organization ID (optional)
    pub organization: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Custom headers to include in requests
    pub custom_headers: HashMap<String, String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            default_model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 120,
            custom_headers: HashMap::new(),
        }
    }
}

impl OpenAIConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let api_key = var("OPENAI_API_KEY")?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = var("OPENAI_DEFAULT_MODEL") {
            config.default_model = model;
        }
        config.organization = var("OPENAI_ORGANIZATION");
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_model_is_fixed() {
        assert_eq!(OpenAIConfig::default().default_model, DEFAULT_MODEL);
    }

    #[test]
    fn test_lookup_requires_api_key() {
        assert!(OpenAIConfig::from_lookup(vars(&[])).is_none());
        assert!(OpenAIConfig::from_lookup(vars(&[("OPENAI_API_KEY", "")])).is_none());
    }

    #[test]
    fn test_lookup_applies_overrides() {
        let config = OpenAIConfig::from_lookup(vars(&[
            ("OPENAI_API_KEY", "key"),
            ("OPENAI_BASE_URL", "http://localhost:9999"),
            ("OPENAI_DEFAULT_MODEL", "custom-model"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.default_model, "custom-model");
    }
}
