//! Error types for Focus Coach.
//!
//! One enum covers every failure category in the workspace: configuration,
//! I/O, the language model, retrieval, document extraction, prompts and the
//! HTTP server.

use thiserror::Error;

/// Unified error type for Focus Coach.
///
/// Library functions return `Result<T, AppError>`; nothing panics on
/// caller-reachable paths.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Text extraction failures for uploaded documents
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Prompt loading and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
