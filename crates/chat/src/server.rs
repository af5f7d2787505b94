//! JSON HTTP API for the coach.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | Answer one chat turn |
//! | `GET`  | `/api/health` | Liveness, model reachability, index size |
//! | `POST` | `/api/documents` | Ingest text documents |
//! | `POST` | `/api/documents/search` | Ranked snippets with distances |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "message must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use coach_core::{AppError, AppResult};
use coach_knowledge::RetrievedChunk;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::context::AppContext;
use crate::service::{self, ChatRequest, ChatResponse, HealthResponse};

type SharedContext = Arc<AppContext>;

/// Build the API router over a shared context.
pub fn router(ctx: SharedContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/health", get(handle_health))
        .route("/api/documents", post(handle_ingest))
        .route("/api/documents/search", post(handle_search))
        .layer(cors)
        .with_state(ctx)
}

/// Serve the API on the configured address until Ctrl-C.
pub async fn run_server(ctx: SharedContext) -> AppResult<()> {
    let bind_addr = ctx.config.server.bind_addr()?;
    let app = router(ctx.clone());

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", bind_addr, e)))?;

    tracing::info!("Coach API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(format!("Server error: {}", e)))?;

    ctx.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error that converts into a JSON HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ POST /api/chat ============

async fn handle_chat(
    State(ctx): State<SharedContext>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    request.validate().map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(service::chat(&ctx, &request).await))
}

// ============ GET /api/health ============

async fn handle_health(State(ctx): State<SharedContext>) -> Json<HealthResponse> {
    Json(service::health(&ctx).await)
}

// ============ POST /api/documents ============

#[derive(Debug, Deserialize)]
struct IngestRequest {
    documents: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct IngestResponse {
    added: usize,
    total: usize,
    dimensions: usize,
}

async fn handle_ingest(
    State(ctx): State<SharedContext>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    // Rebuilding the vector space is CPU-bound
    let stats = tokio::task::spawn_blocking(move || ctx.index.ingest(request.documents))
        .await
        .map_err(|e| internal(format!("ingest task failed: {}", e)))?;

    Ok(Json(IngestResponse {
        added: stats.added,
        total: stats.corpus_size,
        dimensions: stats.dimensions,
    }))
}

// ============ POST /api/documents/search ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchResponse {
    results: Vec<RetrievedChunk>,
}

async fn handle_search(
    State(ctx): State<SharedContext>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let top_k = request.top_k.unwrap_or(ctx.config.retrieval.top_k);
    let results = service::search(&ctx, &request.query, top_k)
        .await
        .map_err(|e| internal(e.to_string()))?;
    Ok(Json(SearchResponse { results }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ResponseSource;
    use crate::testing::{test_context, ScriptedClient};

    #[tokio::test]
    async fn test_chat_handler_answers() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("Plan one small step."));

        let Json(response) = handle_chat(State(ctx), Json(ChatRequest::new("help me plan")))
            .await
            .unwrap();
        assert_eq!(response.response, "Plan one small step.");
        assert_eq!(response.source, ResponseSource::Model);
    }

    #[tokio::test]
    async fn test_chat_handler_rejects_empty_message() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("unused"));

        let err = handle_chat(State(ctx), Json(ChatRequest::new("")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ingest_then_search() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("unused"));

        let Json(ingested) = handle_ingest(
            State(ctx.clone()),
            Json(IngestRequest {
                documents: vec![
                    "cats are great".to_string(),
                    "dogs are great".to_string(),
                ],
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            ingested,
            IngestResponse {
                added: 2,
                total: 2,
                dimensions: 3
            }
        );

        let Json(found) = handle_search(
            State(ctx),
            Json(SearchRequest {
                query: "cats".to_string(),
                top_k: Some(1),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found.results.len(), 1);
        assert_eq!(found.results[0].text, "cats are great");
        assert_eq!(found.results[0].position, 0);
    }

    #[tokio::test]
    async fn test_search_defaults_to_configured_top_k() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("unused"));
        ctx.index.ingest(["a1 note", "b2 note", "c3 note", "d4 note"]);

        let request: SearchRequest = serde_json::from_str(r#"{"query":"note"}"#).unwrap();
        let Json(found) = handle_search(State(ctx), Json(request)).await.unwrap();
        assert_eq!(found.results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("unused"));
        let request: SearchRequest =
            serde_json::from_str(r#"{"query":"  ","topK":2}"#).unwrap();

        let err = handle_search(State(ctx), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("ok"));
        let Json(report) = handle_health(State(ctx)).await;
        assert!(report.ollama_available);
        assert_eq!(report.documents, 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ollamaAvailable"], true);
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_router_builds() {
        let (_dir, ctx) = test_context(ScriptedClient::replying("ok"));
        let _router = router(ctx);
    }
}
