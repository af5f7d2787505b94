//! Application context shared by the chat service and HTTP handlers.

use coach_core::{AppConfig, AppResult};
use coach_knowledge::{collect_sources, DocumentIndex, IndexConfig, IngestStats};
use coach_llm::{create_client, LlmClient};
use coach_prompt::{load_prompt_or_default, PromptDefinition};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Everything a request needs: configuration, the document index, the
/// model client and the active prompt definition.
pub struct AppContext {
    pub config: AppConfig,
    pub index: DocumentIndex,
    pub llm: Arc<dyn LlmClient>,
    pub prompt: PromptDefinition,
}

impl AppContext {
    /// Build a context from validated configuration.
    pub fn build(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let llm = create_client(
            &config.llm.provider,
            Some(config.llm.endpoint.as_str()),
            Duration::from_secs(config.llm.timeout_secs),
        )?;

        Self::with_client(config, llm)
    }

    /// Build a context around an existing LLM client.
    pub fn with_client(config: AppConfig, llm: Arc<dyn LlmClient>) -> AppResult<Self> {
        let prompt = load_prompt_or_default(&config.workspace, &config.chat.prompt_id)?;
        let index = DocumentIndex::with_config(IndexConfig::from(&config.retrieval));

        tracing::info!(
            "Coach ready: provider={} model={} prompt={}",
            llm.provider_name(),
            config.llm.model,
            prompt.id
        );

        Ok(Self {
            config,
            index,
            llm,
            prompt,
        })
    }

    /// Extract documents from `paths` and ingest them, one chunk per file.
    pub fn ingest_paths(&self, paths: &[PathBuf]) -> AppResult<IngestStats> {
        let documents = collect_sources(paths)?;
        Ok(self
            .index
            .ingest(documents.into_iter().map(|document| document.text)))
    }

    /// Release the context, logging final index statistics.
    pub fn shutdown(&self) {
        let stats = self.index.stats();
        tracing::info!(
            "Shutting down: {} documents indexed over {} generations",
            stats.documents,
            stats.generation
        );
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("provider", &self.llm.provider_name())
            .field("model", &self.config.llm.model)
            .field("prompt", &self.prompt.id)
            .field("index", &self.index)
            .finish()
    }
}
