//! Domain-level error types

use thiserror::Error;

/// Failure reported by a capability (claim generator, claim judge, evidence retriever)
///
/// Backend crates convert their own errors into this type at the trait boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// Network or API communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered but its output could not be parsed
    #[error("Malformed output: {0}")]
    Malformed(String),

    /// The backend did not answer in time
    #[error("Capability timed out")]
    Timeout,

    /// The backend (model, index, endpoint) is not available
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    /// Any other failure
    #[error("Capability error: {0}")]
    Other(String),
}

/// Errors raised when building a scoring rubric
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RubricError {
    /// The rubric has no categories
    #[error("Scoring rubric must contain at least one category")]
    Empty,

    /// A category name is empty or whitespace
    #[error("Scoring rubric category names must not be blank")]
    BlankCategory,

    /// A weight is NaN or infinite
    #[error("Invalid weight {weight} for category '{category}'")]
    InvalidWeight {
        /// Category with the bad weight
        category: String,
        /// The rejected weight
        weight: f64,
    },
}
