//! Fixed prompt text shared by the provider clients and the AI service

use super::{GenerationType, WorkflowType};

/// Instruction prefixed to every code-generation request
pub const CODE_SYSTEM_PROMPT: &str =
    "You are an expert full-stack developer. Generate clean, production-ready code following best practices.";

/// Instruction prefixed to every structured-JSON request
pub const STRUCTURE_SYSTEM_PROMPT: &str =
    "You are a software architect. Generate detailed project structures and specifications in JSON format. Always respond with valid JSON.";

const N8N_WORKFLOW_PROMPT: &str =
    "You are an n8n workflow expert. Generate complete n8n workflow JSON that can be imported directly into n8n.";
const N8N_WORKFLOW_DETAIL: &str =
    "Include all necessary nodes, connections, and configurations.";

const FLOWISE_WORKFLOW_PROMPT: &str =
    "You are a Flowise AI expert. Generate complete Flowise flow JSON that can be imported directly into Flowise.";
const FLOWISE_WORKFLOW_DETAIL: &str =
    "Include all AI components, chains, and configurations.";

/// System prompt for workflow generation.
///
/// `detailed` appends the sentence listing what the document must contain.
pub fn workflow_system_prompt(workflow_type: WorkflowType, detailed: bool) -> String {
    let (base, detail) = match workflow_type {
        WorkflowType::N8n => (N8N_WORKFLOW_PROMPT, N8N_WORKFLOW_DETAIL),
        WorkflowType::Flowise => (FLOWISE_WORKFLOW_PROMPT, FLOWISE_WORKFLOW_DETAIL),
    };

    if detailed {
        format!("{} {}", base, detail)
    } else {
        base.to_string()
    }
}

/// User prompt for workflow generation
pub fn workflow_user_prompt(workflow_type: WorkflowType, description: &str) -> String {
    format!("Generate a {} workflow for: {}", workflow_type, description)
}

/// Leading instruction for each generation type
pub fn generation_type_prompt(kind: GenerationType) -> &'static str {
    match kind {
        GenerationType::Component => "Generate a React component with TypeScript",
        GenerationType::Api => "Generate a Next.js API route",
        GenerationType::Schema => "Generate a Prisma database schema",
        GenerationType::Config => "Generate configuration files",
        GenerationType::Content => "Generate high-quality written content",
        GenerationType::Automation => "Generate automation workflow configuration",
    }
}

/// Full prompt for `AIService::generate_code`
pub fn code_prompt(kind: GenerationType, specification: &str) -> String {
    format!(
        "{}:\n\n{}\n\nGenerate clean, production-ready code with proper error handling, TypeScript types, and documentation.",
        generation_type_prompt(kind),
        specification
    )
}

/// Full prompt for `AIService::generate_saas_application`
pub fn saas_prompt(name: &str, description: &str, features: &[String]) -> String {
    format!(
        "Generate a complete SaaS application specification for:

Name: {name}
Description: {description}
Features: {features}

Generate a comprehensive project structure including:
1. File structure with all necessary files
2. Database schema design
3. API endpoints specification
4. Frontend component structure
5. Deployment configuration
6. Environment variables needed
7. Development setup instructions
8. Automation workflows (n8n and Flowise integration)

Respond with a detailed JSON structure that includes all of this information.",
        name = name,
        description = description,
        features = features.join(", "),
    )
}
