//! Command handlers for the coach CLI.

pub mod ask;
pub mod search;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use search::SearchCommand;
pub use serve::ServeCommand;
