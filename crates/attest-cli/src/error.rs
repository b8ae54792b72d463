//! Error types for the CLI application.

use attest_extractor::ExtractorError;
use attest_llm::LlmError;
use attest_pipeline::PipelineError;
use attest_retrieval::RetrievalError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline run failed
    #[error("Evaluation failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// Standalone extraction failed
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// Language model backend could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Knowledge base could not be loaded
    #[error("Knowledge base error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
