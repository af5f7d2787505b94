//! Test doubles shared by the chat crate's unit tests.

use crate::context::AppContext;
use coach_core::{AppConfig, AppError, AppResult};
use coach_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// LLM client that returns a fixed reply and records every prompt.
pub struct ScriptedClient {
    reply: Result<String, String>,
    available: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            available: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            available: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

pub fn test_config(workspace: &Path) -> AppConfig {
    AppConfig {
        workspace: workspace.to_path_buf(),
        ..AppConfig::default()
    }
}

/// A context over a fresh workspace; keep the `TempDir` alive for the test.
pub fn test_context(client: Arc<ScriptedClient>) -> (TempDir, Arc<AppContext>) {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::with_client(test_config(dir.path()), client).unwrap();
    (dir, Arc::new(ctx))
}
