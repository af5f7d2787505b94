//! Prompt loader for YAML prompt definitions.

use crate::types::{PromptContextConfig, PromptDefinition};
use coach_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Identifier of the built-in coach prompt.
pub const DEFAULT_PROMPT_ID: &str = "coach.chat.default";

const DEFAULT_PERSONA: &str = "You are a helpful AI productivity coach. Help users with task management, scheduling, focus, and motivation.";

const DEFAULT_TEMPLATE: &str = "{{persona}}\n\nPrevious conversation:\n{{history}}\n\n{{#if context}}Relevant notes:\n{{context}}\n\n{{/if}}User: {{message}}\nAI:";

/// The built-in productivity coach prompt.
pub fn default_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_PROMPT_ID.to_string(),
        title: "Productivity coach".to_string(),
        api_version: "1.0".to_string(),
        created_by: "coach".to_string(),
        persona: DEFAULT_PERSONA.to_string(),
        system: None,
        context: PromptContextConfig::default(),
        template: DEFAULT_TEMPLATE.to_string(),
    }
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".coach/prompts")
}

/// Load a prompt definition by ID from `.coach/prompts/<id>.yml`.
///
/// # Example
/// ```no_run
/// use coach_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "coach.chat.default")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load a workspace prompt override, or the built-in prompt when the
/// workspace defines none. A present but invalid file is still an error.
pub fn load_prompt_or_default(
    workspace_path: &Path,
    prompt_id: &str,
) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));
    if prompt_file.exists() {
        return load_prompt(workspace_path, prompt_id);
    }

    if prompt_id != DEFAULT_PROMPT_ID {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' not found in {:?}",
            prompt_id,
            prompts_dir(workspace_path)
        )));
    }

    tracing::debug!("Using built-in prompt {}", DEFAULT_PROMPT_ID);
    Ok(default_prompt())
}

fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
