//! Anthropic provider module
//! This module provides the Anthropic implementation of [`AIProvider`](crate::llm::traits::AIProvider)

pub mod client;
pub mod config;
pub mod types;

pub use client::AnthropicClient;
pub use config::AnthropicConfig;
pub use types::{AnthropicError, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Create a new Anthropic client with API key
pub fn create_client(api_key: String, base_url: Option<String>) -> AnthropicClient {
    let mut config = AnthropicConfig::default();
    config.api_key = api_key;

    if let Some(url) = base_url {
        config.base_url = url;
    }

    AnthropicClient::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_defaults() {
        let client = create_client("test-key".to_string(), None);
        assert_eq!(client.config().base_url, config::DEFAULT_BASE_URL);
        assert_eq!(client.config().api_version, "2023-06-01");
    }
}
