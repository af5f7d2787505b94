//! Serve command handler.
//!
//! Builds the application context, pre-loads documents and runs the API.

use clap::Args;
use coach_chat::{run_server, AppContext};
use coach_core::{AppConfig, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Run the chat HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Files or directories to ingest before serving
    #[arg(long = "docs", num_args = 1..)]
    pub docs: Vec<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(self, mut config: AppConfig) -> AppResult<()> {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let ctx = AppContext::build(config)?;

        if !self.docs.is_empty() {
            let stats = ctx.ingest_paths(&self.docs)?;
            tracing::info!(
                "Pre-loaded {} documents ({} dimensions)",
                stats.added,
                stats.dimensions
            );
        }

        run_server(Arc::new(ctx)).await
    }
}
