//! Ask command handler.
//!
//! Runs a single chat turn through the same path as `POST /api/chat`.

use clap::Args;
use coach_chat::{chat, AppContext, ChatRequest, ResponseSource};
use coach_core::{AppConfig, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Answer one chat message
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The message to send to the coach
    pub message: String,

    /// Files or directories to use as retrieval context
    #[arg(short, long = "doc")]
    pub docs: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(self, config: AppConfig) -> AppResult<()> {
        tracing::debug!("Ask command options: {:?}", self);

        let request = ChatRequest::new(self.message);
        request.validate()?;

        let ctx = Arc::new(AppContext::build(config)?);
        if !self.docs.is_empty() {
            ctx.ingest_paths(&self.docs)?;
        }

        let response = chat(&ctx, &request).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", response.response);
            if response.source == ResponseSource::Fallback {
                eprintln!();
                eprintln!("(model unavailable; answered from built-in tips)");
            }
        }

        ctx.shutdown();
        Ok(())
    }
}
