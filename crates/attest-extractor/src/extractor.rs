//! Core FactExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_fact_lines;
use crate::prompt::PromptBuilder;
use attest_domain::{AtomicFact, ClaimGenerator, ExampleProvider};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Decomposes a response into atomic facts
///
/// With a claim generator the response is sent through an extraction
/// prompt; without one the response is split on periods.
pub struct FactExtractor {
    generator: Option<Arc<dyn ClaimGenerator>>,
    example_provider: Option<Arc<dyn ExampleProvider>>,
    config: ExtractorConfig,
}

impl FactExtractor {
    /// Create an extractor without a generator (sentence splitting only)
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            generator: None,
            example_provider: None,
            config,
        }
    }

    /// Extractor with default configuration and no generator
    pub fn basic() -> Self {
        Self::new(ExtractorConfig::default())
    }

    /// Use a claim generator for extraction
    pub fn with_generator(mut self, generator: Arc<dyn ClaimGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Supply few-shot examples to generator prompts
    pub fn with_example_provider(mut self, provider: Arc<dyn ExampleProvider>) -> Self {
        self.example_provider = Some(provider);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Whether a generator is configured
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Extract atomic facts from `response`
    ///
    /// Every fact gets a fresh id and `source_text = response`. Generator
    /// failures are returned as-is; nothing is retried.
    pub async fn extract(
        &self,
        response: &str,
        context: Option<&str>,
    ) -> Result<Vec<AtomicFact>, ExtractorError> {
        match &self.generator {
            Some(generator) => self.extract_with_generator(generator.as_ref(), response, context).await,
            None => {
                debug!("No claim generator configured, splitting on sentences");
                let facts = extract_basic(response);
                info!(fact_count = facts.len(), used_examples = false, "Extracted facts");
                Ok(facts)
            }
        }
    }

    async fn extract_with_generator(
        &self,
        generator: &dyn ClaimGenerator,
        response: &str,
        context: Option<&str>,
    ) -> Result<Vec<AtomicFact>, ExtractorError> {
        // Bounds the prompt; sentence splitting has no such limit
        let length = response.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        let examples: Vec<_> = self
            .example_provider
            .as_ref()
            .map(|provider| provider.provide_examples(response, context))
            .unwrap_or_default()
            .into_iter()
            .take(self.config.max_examples)
            .collect();
        let used_examples = !examples.is_empty();

        let prompt = PromptBuilder::new(response)
            .with_context(context)
            .with_examples(examples)
            .build();

        debug!("Extraction prompt length: {} chars", prompt.len());

        let output = timeout(self.config.extraction_timeout(), generator.generate(&prompt))
            .await
            .map_err(|_| ExtractorError::Timeout)??;

        debug!("Generator output length: {} chars", output.len());

        let facts: Vec<AtomicFact> = parse_fact_lines(&output)
            .into_iter()
            .map(|text| AtomicFact::new(text, response))
            .collect();

        if facts.is_empty() && !response.trim().is_empty() {
            warn!("Generator returned no facts for a non-empty response");
        }

        info!(fact_count = facts.len(), used_examples, "Extracted facts");
        Ok(facts)
    }
}

impl Default for FactExtractor {
    fn default() -> Self {
        Self::basic()
    }
}

/// Split on periods, trim, and drop empty sentences
pub fn extract_basic(response: &str) -> Vec<AtomicFact> {
    response
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(|sentence| AtomicFact::new(sentence, response))
        .collect()
}
