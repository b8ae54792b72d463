//! Attest LLM Provider Layer
//!
//! Backends for the [`ClaimGenerator`] and [`ClaimJudge`] capabilities
//! defined in `attest-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use attest_llm::MockProvider;
//! use attest_domain::ClaimGenerator;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use attest_domain::{CapabilityError, ClaimGenerator, ClaimJudge};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing API key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<LlmError> for CapabilityError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Communication(msg) => CapabilityError::Transport(msg),
            LlmError::InvalidResponse(msg) => CapabilityError::Malformed(msg),
            LlmError::RateLimitExceeded => CapabilityError::Transport("rate limit exceeded".to_string()),
            LlmError::ModelNotAvailable(model) => CapabilityError::Unavailable(model),
            LlmError::Config(msg) => CapabilityError::Other(format!("configuration: {}", msg)),
            LlmError::Other(msg) => CapabilityError::Other(msg),
        }
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockReply {
    fn into_result(self) -> Result<String, CapabilityError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string()).into()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    exact: HashMap<String, MockReply>,
    rules: Vec<(String, MockReply)>,
    queue: VecDeque<MockReply>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making network calls. A prompt
/// is answered by, in order: the next queued reply, an exact-prompt reply,
/// the first substring rule that matches, and finally the default response
/// (or the structured default for structured calls).
///
/// # Examples
///
/// ```
/// use attest_llm::MockProvider;
/// use attest_domain::ClaimGenerator;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_rule("self-contained", "yes");
///
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("Is it self-contained?").await.unwrap(), "yes");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    structured_response: Option<String>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            structured_response: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the default reply for structured calls
    pub fn with_structured_response(mut self, response: impl Into<String>) -> Self {
        self.structured_response = Some(response.into());
        self
    }

    /// Add a specific response for an exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .exact
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Answer any prompt containing `pattern` with `response`
    ///
    /// Rules are checked in insertion order.
    pub fn add_rule(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        self.state()
            .rules
            .push((pattern.into(), MockReply::Text(response.into())));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.state().exact.insert(prompt.into(), MockReply::Error);
    }

    /// Return an error for any prompt containing `pattern`
    pub fn add_error_rule(&mut self, pattern: impl Into<String>) {
        self.state().rules.push((pattern.into(), MockReply::Error));
    }

    /// Queue a one-shot reply, consumed by the next call of either kind
    pub fn queue_response(&self, response: impl Into<String>) {
        self.state().queue.push_back(MockReply::Text(response.into()));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not wedge the other clones.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reply(&self, prompt: &str, fallback: &str) -> Result<String, CapabilityError> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        if let Some(reply) = state.queue.pop_front() {
            return reply.into_result();
        }
        if let Some(reply) = state.exact.get(prompt) {
            return reply.clone().into_result();
        }
        if let Some((_, reply)) = state.rules.iter().find(|(pattern, _)| prompt.contains(pattern.as_str())) {
            return reply.clone().into_result();
        }

        Ok(fallback.to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ClaimGenerator for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        self.reply(prompt, &self.default_response)
    }
}

#[async_trait]
impl ClaimJudge for MockProvider {
    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &str,
        _system_prompt: Option<&str>,
    ) -> Result<String, CapabilityError> {
        let fallback = self
            .structured_response
            .as_deref()
            .unwrap_or(&self.default_response);
        self.reply(prompt, fallback)
    }
}
