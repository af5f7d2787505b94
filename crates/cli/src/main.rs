//! Focus Coach CLI
//!
//! Main entry point for the `coach` command-line tool.
//! Runs the chat API server and offers one-shot chat and search commands.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coach_core::{config::CliOverrides, logging, AppConfig};
use commands::{AskCommand, SearchCommand, ServeCommand};
use std::path::PathBuf;
use tracing::Instrument;

/// Focus Coach - a productivity coach backed by a local language model
#[derive(Parser, Debug)]
#[command(name = "coach")]
#[command(about = "Productivity coach chat backend with document retrieval", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "COACH_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.coach/config.yaml)
    #[arg(short, long, global = true, env = "COACH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the chat HTTP API
    Serve(ServeCommand),

    /// Answer one chat message
    Ask(AskCommand),

    /// Rank document snippets against a query
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)
        .context("Failed to load configuration")?
        .with_overrides(CliOverrides {
            provider: cli.provider,
            model: cli.model,
            log_level: cli.log_level,
            verbose: cli.verbose,
            no_color: cli.no_color,
            log_json: cli.log_json,
        });

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)
        .context("Failed to initialize logging")?;

    tracing::info!("Focus Coach starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let span = tracing::info_span!("command", name = command_name);

    let result = async {
        match cli.command {
            Commands::Serve(cmd) => cmd.execute(config).await,
            Commands::Ask(cmd) => cmd.execute(config).await,
            Commands::Search(cmd) => cmd.execute(&config),
        }
    }
    .instrument(span)
    .await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("coach {} failed", command_name))
}
