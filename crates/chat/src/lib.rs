//! Chat backend for the productivity coach.
//!
//! Wires the document index, the prompt builder and an LLM client into a
//! chat service, and exposes it over a JSON HTTP API.

pub mod context;
pub mod fallback;
pub mod server;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use context::AppContext;
pub use server::{router, run_server};
pub use service::{
    chat, health, search, ChatRequest, ChatResponse, HealthResponse, ResponseSource,
};
