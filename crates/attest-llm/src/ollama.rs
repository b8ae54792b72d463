//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, so claims can be
//! extracted and judged without sending responses to a hosted service.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, model and temperature
//! - JSON mode and system prompts for structured judgments
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use attest_llm::OllamaProvider;
//! use attest_domain::ClaimGenerator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//! let facts = provider.generate("List the facts in: Paris is in France.").await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use attest_domain::{CapabilityError, ClaimGenerator, ClaimJudge};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    temperature: Option<f32>,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
        }
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Model name this provider sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.send(prompt, None, None).await
    }

    /// Generate JSON output constrained by a schema
    ///
    /// The schema is passed through Ollama's `format` field; a schema that is
    /// not valid JSON falls back to plain JSON mode.
    pub async fn complete_json(
        &self,
        prompt: &str,
        schema: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let format = serde_json::from_str::<serde_json::Value>(schema)
            .unwrap_or_else(|_| serde_json::Value::String("json".to_string()));
        self.send(prompt, system_prompt, Some(format)).await
    }

    async fn send(
        &self,
        prompt: &str,
        system: Option<&str>,
        format: Option<serde_json::Value>,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            system,
            format,
            options: self.temperature.map(|temperature| OllamaOptions { temperature }),
        };

        debug!("Ollama request: model {}, prompt {} chars", self.model, prompt.len());

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .await
                            .map(|body| body.response)
                            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama request failed (attempt {}/{}), retrying in {:?}", attempts, self.max_retries, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl ClaimGenerator for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        Ok(self.complete(prompt).await?)
    }
}

#[async_trait]
impl ClaimJudge for OllamaProvider {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CapabilityError> {
        Ok(self.complete_json(prompt, schema, system_prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama2");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model(), "llama2");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_ollama_provider_builders() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama2")
            .with_max_retries(5)
            .with_temperature(0.0);
        assert_eq!(provider.max_retries, 5);
        assert_eq!(provider.temperature, Some(0.0));

        // Zero attempts would never send a request
        let provider = OllamaProvider::default_endpoint("llama2").with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[tokio::test]
    async fn test_ollama_generate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama3",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Paris is in France.", "done": true}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "llama3");
        let result = provider.generate("extract").await.unwrap();

        assert_eq!(result, "Paris is in France.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ollama_structured_sends_schema_and_system() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "system": "Output JSON",
                "format": {"type": "object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "{\"category\": \"supported\", \"confidence\": 0.8}", "done": true}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "llama3");
        let result = provider
            .generate_structured("classify", r#"{"type": "object"}"#, Some("Output JSON"))
            .await
            .unwrap();

        assert!(result.contains("supported"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ollama_model_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(404)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "missing-model");
        let result = provider.generate("test").await;

        assert_eq!(result, Err(CapabilityError::Unavailable("missing-model".to_string())));
    }

    #[tokio::test]
    async fn test_ollama_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "llama3");
        let result = provider.generate("test").await;

        assert!(matches!(result, Err(CapabilityError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OllamaProvider::new("http://localhost:99999", "llama2").with_max_retries(1);

        let result = provider.complete("test").await;

        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }
}
