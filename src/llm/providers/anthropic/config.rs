//! Anthropic provider configuration
//! This module contains configuration structures and defaults specific to Anthropic

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Token budget for code generation
pub const CODE_MAX_TOKENS: u32 = 4000;
/// Token budget for structured-JSON generation
pub const STRUCTURE_MAX_TOKENS: u32 = 3000;
/// Token budget for workflow generation
pub const WORKFLOW_MAX_TOKENS: u32 = 4000;

/// Anthropic-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for API requests
    pub base_url: String,
    /// Default model to use
    pub default_model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Custom headers to include in requests
    pub custom_headers: HashMap<String, String>,
    /// API version to use
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 120,
            custom_headers: HashMap::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl AnthropicConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `ANTHROPIC_API_KEY` is unset or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let api_key = var("ANTHROPIC_API_KEY")?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };
        if let Some(base_url) = var("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = var("ANTHROPIC_DEFAULT_MODEL") {
            config.default_model = model;
        }
        Some(config)
    }
}
