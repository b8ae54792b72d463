//! Error types for the FactExtractor

use attest_domain::CapabilityError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Claim generator failed
    #[error("Generator error: {0}")]
    Generator(#[from] CapabilityError),

    /// Response exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Generator did not answer in time
    #[error("Extraction timeout")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
