//! Prompt types for the coach.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Coach persona, rendered at the top of every prompt
    pub persona: String,

    /// Optional system message sent alongside the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Context injection settings
    #[serde(default)]
    pub context: PromptContextConfig,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// Context injection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContextConfig {
    /// Render previous conversation turns
    #[serde(rename = "includeHistory", default = "default_true")]
    pub include_history: bool,

    /// Render snippets retrieved from the document index
    #[serde(rename = "includeKnowledge", default = "default_true")]
    pub include_knowledge: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PromptContextConfig {
    fn default() -> Self {
        Self {
            include_history: true,
            include_knowledge: true,
        }
    }
}

/// One previous exchange in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, ai: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ai: ai.into(),
        }
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// Rendered prompt text
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Number of history turns rendered
    #[serde(rename = "historyTurns")]
    pub history_turns: usize,

    /// Number of retrieved snippets rendered
    #[serde(rename = "snippetsUsed")]
    pub snippets_used: usize,
}
