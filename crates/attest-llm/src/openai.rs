//! OpenAI-compatible chat completions provider
//!
//! Works against api.openai.com or any server exposing the same
//! `/chat/completions` endpoint. Structured calls embed the JSON schema in
//! the system prompt and request `response_format = json_object`.

use crate::LlmError;
use async_trait::async_trait;
use attest_domain::{CapabilityError, ClaimGenerator, ClaimJudge};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable read by [`OpenAiProvider::from_env`] by default
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Chat-completions provider
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
        }
    }

    /// Create a provider reading the API key from `var`
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the variable is unset or empty.
    pub fn from_env(var: &str, model: impl Into<String>) -> Result<Self, LlmError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key, model)),
            _ => Err(LlmError::Config(format!("environment variable {} is not set", var))),
        }
    }

    /// Point the provider at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
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

    /// Single user-message completion
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let messages = json!([{ "role": "user", "content": prompt }]);
        self.chat(messages, false).await
    }

    /// JSON completion constrained by `schema`
    ///
    /// The schema is announced in the system prompt; `system_prompt`, when
    /// given, is prepended to that announcement.
    pub async fn complete_json(
        &self,
        prompt: &str,
        schema: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let schema_line = format!("Output valid JSON according to this schema: {}", schema);
        let system = match system_prompt {
            Some(extra) => format!("{}\n\n{}", extra, schema_line),
            None => schema_line,
        };
        let messages = json!([
            { "role": "system", "content": system },
            { "role": "user", "content": prompt }
        ]);
        self.chat(messages, true).await
    }

    async fn chat(&self, messages: Value, json_mode: bool) -> Result<String, LlmError> {
        let mut request = json!({
            "model": self.model,
            "messages": messages,
        });
        if json_mode {
            request["response_format"] = json!({ "type": "json_object" });
        }
        if let Some(temperature) = self.temperature {
            request["temperature"] = json!(temperature);
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!("OpenAI request: model {}, json mode {}", self.model, json_mode);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response
                            .json()
                            .await
                            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
                        return body["choices"][0]["message"]["content"]
                            .as_str()
                            .map(str::to_string)
                            .ok_or_else(|| LlmError::InvalidResponse("Missing message content".to_string()));
                    }
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    }
                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(LlmError::Config("API key rejected".to_string()));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_server_error() {
                        last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                    } else {
                        return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("OpenAI request failed (attempt {}/{}), retrying in {:?}", attempts, self.max_retries, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl ClaimGenerator for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        Ok(self.complete(prompt).await?)
    }
}

#[async_trait]
impl ClaimJudge for OpenAiProvider {
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

    fn completion_body(content: &str) -> String {
        json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = OpenAiProvider::from_env("ATTEST_TEST_KEY_THAT_IS_NEVER_SET", "gpt-4");
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAiProvider::new("key", "gpt-4").with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.model(), "gpt-4");
    }

    #[tokio::test]
    async fn test_generate_sends_user_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4",
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("yes"))
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test", "gpt-4").with_base_url(server.url());
        let result = provider.generate("hello").await.unwrap();

        assert_eq!(result, "yes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_structured_uses_json_mode_and_schema() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({ "response_format": { "type": "json_object" } })),
                Matcher::Regex("Output valid JSON according to this schema".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(r#"{"category":"supported","confidence":0.9}"#))
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test", "gpt-4").with_base_url(server.url());
        let result = provider
            .generate_structured("classify", r#"{"type":"object"}"#, None)
            .await
            .unwrap();

        assert!(result.contains("supported"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_as_transport() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test", "gpt-4")
            .with_base_url(server.url())
            .with_max_retries(1);

        assert!(matches!(provider.complete("x").await, Err(LlmError::RateLimitExceeded)));
        assert!(matches!(provider.generate("x").await, Err(CapabilityError::Transport(_))));
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test", "gpt-4").with_base_url(server.url());
        let result = provider.generate("x").await;

        assert!(matches!(result, Err(CapabilityError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(404)
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test", "gpt-9").with_base_url(server.url());
        let result = provider.generate("x").await;

        assert_eq!(result, Err(CapabilityError::Unavailable("gpt-9".to_string())));
    }
}
