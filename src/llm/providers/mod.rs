//! LLM Providers Module
//!
//! This module contains implementations for the supported LLM providers,
//! organized by provider with each having its own subdirectory containing:
//! - client.rs: Provider-specific client implementation
//! - config.rs: Provider-specific configuration and defaults
//! - types.rs: Provider-specific request/response types
//! - mod.rs: Module exports

pub mod anthropic;
pub mod openai;

// Re-export provider clients for convenience
pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use openai::{OpenAIClient, OpenAIConfig};
