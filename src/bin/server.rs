// SaaS Forge - API Server
// Authenticated JSON gateway over LLM providers and automation backends
// Run with: cargo run --bin server

//! # SaaS Forge Server Binary
//!
//! Starts the HTTP API described in the library crate.
//!
//! ```text
//! main()
//!   ↓ loads
//! .env + AppConfig::from_env()
//!   ↓ builds
//! ApiServerBuilder
//!   ↓ serves
//! /api/ai/*, /api/automation/*, /api/queue/status, /api/health
//! ```
//!
//! Flags override the corresponding environment variables
//! (`SERVER_HOST`, `SERVER_PORT`).

use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use saas_forge::{ApiServerBuilder, AppConfig, LLMProviderType};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "saas-forge-server")]
#[command(about = "SaaS Forge API server")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Disable the permissive CORS layer
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set variables directly
    let dotenv_result = dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = dotenv_result {
        warn!("Could not load .env file: {}", e);
    }

    let args = Args::parse();
    let app_config = AppConfig::from_env();

    info!("Starting SaaS Forge server");
    info!("Environment: {}", app_config.server.environment);
    for provider in [LLMProviderType::OpenAI, LLMProviderType::Anthropic] {
        if app_config.providers.is_configured(provider) {
            info!("{:?} API key configured", provider);
        } else {
            warn!("{:?} API key not set; requests naming it will get 503", provider);
        }
    }
    if let Some(flowise) = &app_config.automation.flowise {
        info!("Flowise configured at {}", flowise.base_url);
    }
    if let Some(n8n) = &app_config.automation.n8n {
        info!("n8n configured at {}", n8n.base_url);
    }

    let mut builder = ApiServerBuilder::new()
        .with_app_config(app_config)
        .with_cors(!args.no_cors);
    if let Some(host) = args.host {
        builder = builder.with_host(host);
    }
    if let Some(port) = args.port {
        builder = builder.with_port(port);
    }

    builder
        .build()
        .run()
        .await
        .map_err(|e| anyhow!("server error: {}", e))
}
