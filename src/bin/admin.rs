//! SaaS Forge Admin CLI
//!
//! Operator tool for checking the automation backends and running the AI
//! generators from a terminal, using the same environment as the server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dotenv::dotenv;
use saas_forge::{
    create_ai_service, AutomationConfig, AutomationError, AutomationService, ForgeError,
    GenerationOptions, GenerationType, ProviderSettings, WorkflowType,
};
use serde_json::Value;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "saas-forge-admin")]
#[command(about = "SaaS Forge Admin CLI - inspect automation backends and run generators")]
#[command(version = "1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configured services and probe their health
    Health,

    /// Flowise management
    Flowise {
        #[command(subcommand)]
        action: FlowiseCommands,
    },

    /// n8n management
    N8n {
        #[command(subcommand)]
        action: N8nCommands,
    },

    /// Run an AI generator
    Generate {
        #[command(subcommand)]
        target: GenerateCommands,
    },
}

#[derive(Subcommand)]
enum FlowiseCommands {
    /// List chatflows
    List,

    /// Send a message to the configured chatflow
    Chat {
        message: String,

        #[arg(long)]
        session_id: Option<String>,
    },

    /// Delete a chatflow
    Delete {
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Subcommand)]
enum N8nCommands {
    /// List workflows
    List,

    /// List executions, optionally for one workflow
    Executions {
        #[arg(long)]
        workflow_id: Option<String>,
    },

    /// Execute a workflow with optional JSON input
    Execute {
        workflow_id: String,

        /// JSON document passed as the execution's data
        #[arg(long)]
        data: Option<String>,
    },

    /// Activate a workflow
    Activate { workflow_id: String },

    /// Deactivate a workflow
    Deactivate { workflow_id: String },

    /// Delete a workflow
    Delete {
        workflow_id: String,

        /// Confirm the deletion
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Generate code (component, api, schema, config, content, automation)
    Code {
        #[arg(long = "type")]
        kind: String,
        specification: String,
        #[arg(long)]
        provider: Option<String>,
    },

    /// Generate an n8n or Flowise workflow
    Workflow {
        #[arg(long = "type")]
        kind: String,
        description: String,
        #[arg(long)]
        provider: Option<String>,
    },

    /// Generate a SaaS application specification
    Saas {
        name: String,
        description: String,
        /// Repeat for each feature
        #[arg(long = "feature")]
        features: Vec<String>,
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Health => show_health().await,
        Commands::Flowise { action } => handle_flowise(action).await?,
        Commands::N8n { action } => handle_n8n(action).await?,
        Commands::Generate { target } => handle_generate(target).await?,
    }
    Ok(())
}

fn print_json(value: &Value) -> saas_forge::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_marker(ok: bool) -> colored::ColoredString {
    if ok {
        "ok".green()
    } else {
        "unavailable".red()
    }
}

async fn show_health() {
    let service = AutomationService::from_env();
    let services = service.available_services();
    let health = service.health_check().await;
    let providers = ProviderSettings::from_env();

    println!("{}", "AI providers".bold());
    println!("  openai     {}", status_marker(providers.openai.is_some()));
    println!("  anthropic  {}", status_marker(providers.anthropic.is_some()));

    println!("{}", "Automation".bold());
    println!(
        "  flowise    configured={} reachable={}",
        services.flowise,
        status_marker(health.flowise)
    );
    println!(
        "  n8n        configured={} reachable={}",
        services.n8n,
        status_marker(health.n8n)
    );

    for message in &health.errors {
        println!("  {}", message.yellow());
    }
}

fn automation() -> AutomationService {
    AutomationService::new(AutomationConfig::from_env())
}

async fn handle_flowise(action: FlowiseCommands) -> saas_forge::Result<()> {
    let service = automation();
    let flowise = service.flowise_service().ok_or_else(|| {
        AutomationError::NotConfigured(
            "Flowise service not configured (set FLOWISE_BASE_URL)".to_string(),
        )
    })?;

    match action {
        FlowiseCommands::List => {
            let flows = flowise.get_chatflows().await?;
            println!("{} {}", "Chatflows:".bold(), flows.len());
            for flow in flows {
                println!(
                    "  {}  {}",
                    flow.id.unwrap_or_default().cyan(),
                    flow.name.unwrap_or_default()
                );
            }
        }
        FlowiseCommands::Chat {
            message,
            session_id,
        } => {
            let options = saas_forge::automation::flowise::SendMessageOptions {
                session_id,
                ..Default::default()
            };
            let reply = flowise.send_message(&message, &options).await?;
            print_json(&reply)?;
        }
        FlowiseCommands::Delete { id, confirm } => {
            if !confirm {
                error!("Delete operation requires --confirm flag for safety");
                return Ok(());
            }
            flowise.delete_chatflow(&id).await?;
            println!("{} chatflow {}", "Deleted".green(), id);
        }
    }
    Ok(())
}

async fn handle_n8n(action: N8nCommands) -> saas_forge::Result<()> {
    let service = automation();
    let n8n = service.n8n_service().ok_or_else(|| {
        AutomationError::NotConfigured("n8n service not configured (set N8N_BASE_URL)".to_string())
    })?;

    match action {
        N8nCommands::List => {
            let workflows = n8n.get_workflows().await?;
            println!("{} {}", "Workflows:".bold(), workflows.len());
            for workflow in workflows {
                let active = if workflow.active.unwrap_or(false) {
                    "active".green()
                } else {
                    "inactive".dimmed()
                };
                println!(
                    "  {}  {}  {}",
                    workflow.id.unwrap_or_default().cyan(),
                    workflow.name.unwrap_or_default(),
                    active
                );
            }
        }
        N8nCommands::Executions { workflow_id } => {
            let executions = n8n.get_executions(workflow_id.as_deref()).await?;
            print_json(&Value::Array(executions))?;
        }
        N8nCommands::Execute { workflow_id, data } => {
            let data = data
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()
                .map_err(|e| {
                    ForgeError::InvalidInput(format!("--data must be valid JSON: {}", e))
                })?;
            let result = n8n.execute_workflow(&workflow_id, data).await?;
            let status = if result.success {
                "finished".green()
            } else {
                "not finished".yellow()
            };
            println!(
                "Execution {} {}",
                result.execution_id.as_deref().unwrap_or("-"),
                status
            );
            print_json(&serde_json::to_value(&result)?)?;
        }
        N8nCommands::Activate { workflow_id } => {
            n8n.set_workflow_active(&workflow_id, true).await?;
            println!("{} workflow {}", "Activated".green(), workflow_id);
        }
        N8nCommands::Deactivate { workflow_id } => {
            n8n.set_workflow_active(&workflow_id, false).await?;
            println!("{} workflow {}", "Deactivated".yellow(), workflow_id);
        }
        N8nCommands::Delete {
            workflow_id,
            confirm,
        } => {
            if !confirm {
                error!("Delete operation requires --confirm flag for safety");
                return Ok(());
            }
            n8n.delete_workflow(&workflow_id).await?;
            println!("{} workflow {}", "Deleted".green(), workflow_id);
        }
    }
    Ok(())
}

async fn handle_generate(target: GenerateCommands) -> saas_forge::Result<()> {
    let service = create_ai_service(&ProviderSettings::from_env());
    info!("Available providers: {:?}", service.available_providers());

    match target {
        GenerateCommands::Code {
            kind,
            specification,
            provider,
        } => {
            let kind: GenerationType = kind.parse()?;
            let code = service
                .generate_code(
                    kind,
                    &specification,
                    provider.as_deref(),
                    &GenerationOptions::default(),
                )
                .await?;
            println!("{}", code);
        }
        GenerateCommands::Workflow {
            kind,
            description,
            provider,
        } => {
            let kind: WorkflowType = kind.parse()?;
            let workflow = service
                .generate_workflow(&description, kind, provider.as_deref())
                .await?;
            print_json(&workflow)?;
        }
        GenerateCommands::Saas {
            name,
            description,
            features,
            provider,
        } => {
            let spec = service
                .generate_saas_application(&name, &description, &features, provider.as_deref())
                .await?;
            print_json(&spec)?;
        }
    }
    Ok(())
}
