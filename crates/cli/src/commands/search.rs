//! Search command handler.
//!
//! Ingests documents into a fresh index and prints the ranked snippets.

use clap::Args;
use coach_core::{AppConfig, AppResult};
use coach_knowledge::{collect_sources, DocumentIndex, IndexConfig, RetrievedChunk};
use std::path::PathBuf;

/// Rank document snippets against a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Free-text query
    pub query: String,

    /// Files or directories to search
    #[arg(short, long = "doc", required = true)]
    pub docs: Vec<PathBuf>,

    /// Number of results (default: retrieval.topK)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let results = self.run(config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            println!("No documents matched.");
            return Ok(());
        }

        for (rank, result) in results.iter().enumerate() {
            println!(
                "{}. [#{} distance {:.4}] {}",
                rank + 1,
                result.position,
                result.distance,
                preview(&result.text, 120)
            );
        }

        Ok(())
    }

    fn run(&self, config: &AppConfig) -> AppResult<Vec<RetrievedChunk>> {
        let documents = collect_sources(&self.docs)?;
        let index = DocumentIndex::with_config(IndexConfig::from(&config.retrieval));
        index.ingest(documents.into_iter().map(|document| document.text));

        let top_k = self.top_k.unwrap_or(config.retrieval.top_k);
        Ok(index.query_scored(&self.query, top_k))
    }
}

/// First `max_chars` characters of `text` on one line.
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut)
}
