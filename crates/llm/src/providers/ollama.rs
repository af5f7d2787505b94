//! Ollama LLM provider implementation.
//!
//! Ollama is a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use coach_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default timeout for generation requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API, without trailing slash
    base_url: String,

    /// Timeout applied to generation requests
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `http://localhost:11434` with a 30 second timeout.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert LlmRequest to Ollama format.
    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaRequest {
        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            stream: false,
        }
    }

    /// Convert Ollama response to LlmResponse.
    fn convert_response(&self, response: OllamaResponse) -> LlmResponse {
        let usage = LlmUsage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        );

        LlmResponse {
            content: response.response.trim().to_string(),
            model: response.model,
            usage,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::info!("Received completion from Ollama");
        tracing::debug!("Response: {:?}", ollama_response);

        Ok(self.convert_response(ollama_response))
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        // Any HTTP answer counts as reachable
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Ollama not reachable at {}: {}", self.base_url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = OllamaClient::with_timeout("http://ollama:11434/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://ollama:11434");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_ollama_request_conversion() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("Hello", "llama2").with_system("Be brief");

        let ollama_req = client.to_ollama_request(&request);
        assert_eq!(ollama_req.model, "llama2");
        assert_eq!(ollama_req.prompt, "Hello");
        assert!(!ollama_req.stream);

        assert_eq!(ollama_req.system.as_deref(), Some("Be brief"));
    }

    #[test]
    fn test_request_wire_format() {
        let client = OllamaClient::new();
        let json = serde_json::to_value(client.to_ollama_request(&LlmRequest::new("Hi", "llama2")))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "llama2", "prompt": "Hi", "stream": false})
        );
    }

    #[test]
    fn test_response_is_trimmed() {
        let client = OllamaClient::new();
        let raw: OllamaResponse = serde_json::from_str(
            r#"{"model":"llama2","response":"  Try a focus sprint.\n","done":true,"eval_count":7}"#,
        )
        .unwrap();

        let response = client.convert_response(raw);
        assert_eq!(response.content, "Try a focus sprint.");
        assert_eq!(response.usage.completion_tokens, 7);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = OllamaClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(1));
        assert!(!client.is_available().await);
        assert!(client.complete(&LlmRequest::new("hi", "llama2")).await.is_err());
    }
}
