//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, ChatTurn, PromptDefinition};
use coach_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition, the user's message and its context.
///
/// Only the last `history_window` turns of `history` are rendered, oldest
/// first, as `User: ...` / `AI: ...` lines. Snippets are rendered in the
/// order given.
///
/// Template variables: `persona`, `history`, `context`, `message`.
///
/// # Example
/// ```no_run
/// use coach_prompt::{build_prompt, default_prompt, ChatTurn};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let history = vec![ChatTurn::new("Hi", "Hello! What are you working on?")];
/// let snippets = vec!["Work in 25 minute sprints.".to_string()];
///
/// let built = build_prompt(&default_prompt(), "I can't focus", &history, &snippets, 5)?;
/// println!("{}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    message: &str,
    history: &[ChatTurn],
    snippets: &[String],
    history_window: usize,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let recent: &[ChatTurn] = if definition.context.include_history {
        &history[history.len().saturating_sub(history_window)..]
    } else {
        &[]
    };

    let snippets: &[String] = if definition.context.include_knowledge {
        snippets
    } else {
        &[]
    };

    let mut variables = HashMap::new();
    variables.insert("persona".to_string(), definition.persona.trim().to_string());
    variables.insert("history".to_string(), format_history(recent));
    variables.insert("context".to_string(), format_snippets(snippets));
    variables.insert("message".to_string(), message.to_string());

    let rendered = render_template(&definition.template, &variables)?;

    tracing::debug!(
        "Rendered prompt with {} history turns and {} snippets",
        recent.len(),
        snippets.len()
    );

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user: rendered,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            history_turns: recent.len(),
            snippets_used: snippets.len(),
        },
    })
}

fn format_history(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("User: {}\nAI: {}", turn.user, turn.ai))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_snippets(snippets: &[String]) -> String {
    snippets
        .iter()
        .map(|snippet| format!("- {}", snippet.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
