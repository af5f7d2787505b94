//! Prompt system for the coach.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions with a built-in default
//! - Handlebars template rendering
//! - Conversation history and retrieved-context injection

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_prompt, load_prompt, load_prompt_or_default};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, ChatTurn, PromptContextConfig, PromptDefinition,
};
