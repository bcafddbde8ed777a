//! OpenAI provider module
//! This module provides the OpenAI implementation of [`AIProvider`](crate::llm::traits::AIProvider)

pub mod client;
pub mod config;
pub mod types;

pub use client::OpenAIClient;
pub use config::OpenAIConfig;
pub use types::{OpenAIChatMessage, OpenAIError, OpenAIRequest, OpenAIResponse, OpenAIUsage};

/// Create a new OpenAI client with API key
pub fn create_client(api_key: String, base_url: Option<String>) -> OpenAIClient {
    let mut config = OpenAIConfig::default();
    config.api_key = api_key;

    if let Some(url) = base_url {
        config.base_url = url;
    }

    OpenAIClient::new(config)
}
