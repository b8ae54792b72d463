//! Configuration for pipeline runs
//!
//! One TOML document configures every component. Missing keys fall back to
//! their defaults.

use crate::error::PipelineError;
use attest_containment::ContainmentConfig;
use attest_domain::ScoringRubric;
use attest_evaluator::ClassifierConfig;
use attest_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default similarity threshold for deduplication
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.85;

/// Default number of documents kept per fact
pub const DEFAULT_RETRIEVAL_TOP_K: usize = 3;

/// Configuration for the evaluation pipeline
///
/// # Examples
///
/// ```
/// use attest_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml(
///     r#"
///     dedup_threshold = 0.9
///     max_concurrency = 4
///
///     [rubric]
///     relevant = 1.0
///     irrelevant = 0.0
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.dedup_threshold, 0.9);
/// assert_eq!(config.retrieval_top_k, 3);
/// assert_eq!(config.rubric().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Facts at or above this similarity to a kept fact are dropped
    pub dedup_threshold: f64,

    /// Maximum documents passed to the classifier per fact
    pub retrieval_top_k: usize,

    /// Facts retrieved and classified at once (1 = sequential)
    pub max_concurrency: usize,

    /// Run the containment check and repair stages
    pub enable_containment: bool,

    /// Category → weight; the keys are the valid categories
    pub rubric: BTreeMap<String, f64>,

    /// Extractor settings
    pub extractor: ExtractorConfig,

    /// Containment settings
    pub containment: ContainmentConfig,

    /// Classifier settings
    pub classifier: ClassifierConfig,

    /// Language model backend, read by callers that build capabilities
    pub llm: LlmSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
            max_concurrency: 1,
            enable_containment: false,
            rubric: ScoringRubric::default().weights().clone(),
            extractor: ExtractorConfig::default(),
            containment: ContainmentConfig::default(),
            classifier: ClassifierConfig::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str).map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize TOML: {}", e)))
    }

    /// Scoring rubric built from the `rubric` table
    pub fn rubric(&self) -> Result<ScoringRubric, PipelineError> {
        ScoringRubric::new(self.rubric.iter().map(|(category, weight)| (category.clone(), *weight)))
            .map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(PipelineError::Config(format!(
                "dedup_threshold must be in [0, 1], got {}",
                self.dedup_threshold
            )));
        }
        if self.retrieval_top_k == 0 {
            return Err(PipelineError::Config("retrieval_top_k must be greater than 0".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(PipelineError::Config("max_concurrency must be greater than 0".to_string()));
        }
        self.rubric()?;
        self.extractor.validate().map_err(PipelineError::Config)?;
        self.containment.validate().map_err(PipelineError::Config)?;
        self.classifier.validate().map_err(PipelineError::Config)?;
        Ok(())
    }
}

/// Language model backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// No model: basic extraction only, evaluation unavailable
    #[default]
    None,
    /// Local Ollama server
    Ollama,
    /// OpenAI chat-completions API
    OpenAi,
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Backend kind
    pub provider: ProviderKind,

    /// Model name
    pub model: String,

    /// Endpoint override (Ollama URL or OpenAI-compatible base URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::None,
            model: "llama3".to_string(),
            endpoint: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
        }
    }
}
