//! Chat turn handling: retrieval, prompt assembly, generation and fallback.

use crate::context::AppContext;
use crate::fallback;
use coach_core::{AppError, AppResult};
use coach_knowledge::RetrievedChunk;
use coach_llm::LlmRequest;
use coach_prompt::{build_prompt, ChatTurn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Incoming chat turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,

    /// Previous exchanges, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,

    /// Attached image (accepted but not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.message.trim().is_empty() {
            return Err(AppError::Other("message must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Where a chat response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Model,
    Fallback,
}

/// Outgoing chat answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,

    /// False only when the turn failed outside the model call
    pub success: bool,

    pub source: ResponseSource,

    /// Number of retrieved snippets spliced into the prompt
    pub context_used: usize,
}

impl ChatResponse {
    fn fallback(message: &str, success: bool, context_used: usize) -> Self {
        Self {
            response: fallback::respond(message).to_string(),
            success,
            source: ResponseSource::Fallback,
            context_used,
        }
    }
}

/// Service health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub ollama_available: bool,
    pub documents: usize,
}

/// Rank indexed chunks against `query` on the blocking pool.
pub async fn search(
    ctx: &Arc<AppContext>,
    query: &str,
    top_k: usize,
) -> AppResult<Vec<RetrievedChunk>> {
    let ctx = Arc::clone(ctx);
    let query = query.to_string();

    // Scoring scans every stored vector
    tokio::task::spawn_blocking(move || ctx.index.query_scored(&query, top_k))
        .await
        .map_err(|e| AppError::Other(format!("search task failed: {}", e)))
}

/// Answer one chat turn. Always produces a response.
///
/// A failed or empty model reply is answered by the keyword responder and
/// still counts as a success; any other failure yields a fallback answer
/// with `success = false`.
pub async fn chat(ctx: &Arc<AppContext>, request: &ChatRequest) -> ChatResponse {
    if request.image.is_some() {
        tracing::debug!("Ignoring attached image");
    }

    let snippets: Vec<String> =
        match search(ctx, &request.message, ctx.config.retrieval.top_k).await {
            Ok(hits) => hits.into_iter().map(|hit| hit.text).collect(),
            Err(e) => {
                tracing::warn!("Retrieval failed: {}", e);
                return ChatResponse::fallback(&request.message, false, 0);
            }
        };

    let built = match build_prompt(
        &ctx.prompt,
        &request.message,
        &request.history,
        &snippets,
        ctx.config.chat.history_window,
    ) {
        Ok(built) => {
            tracing::debug!(
                "Built prompt {}: {} history turns, {} snippets",
                built.metadata.source_prompt_id,
                built.metadata.history_turns,
                built.metadata.snippets_used
            );
            built
        }
        Err(e) => {
            tracing::warn!("Prompt assembly failed: {}", e);
            return ChatResponse::fallback(&request.message, false, 0);
        }
    };

    let mut llm_request = LlmRequest::new(built.user, ctx.config.llm.model.clone());
    if let Some(system) = built.system {
        llm_request = llm_request.with_system(system);
    }

    match ctx.llm.complete(&llm_request).await {
        Ok(reply) if !reply.content.trim().is_empty() => ChatResponse {
            response: reply.content.trim().to_string(),
            success: true,
            source: ResponseSource::Model,
            context_used: snippets.len(),
        },
        Ok(_) => {
            tracing::warn!("Model returned an empty reply, using fallback");
            ChatResponse::fallback(&request.message, true, snippets.len())
        }
        Err(e) => {
            tracing::warn!("Model call failed, using fallback: {}", e);
            ChatResponse::fallback(&request.message, true, snippets.len())
        }
    }
}

/// Report liveness, model reachability and index size.
pub async fn health(ctx: &AppContext) -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        ollama_available: ctx.llm.is_available().await,
        documents: ctx.index.len(),
    }
}
