//! Evaluator error types

use attest_domain::{CapabilityError, FactId};
use thiserror::Error;

/// Errors raised while classifying a fact
///
/// `Judge`, `MalformedOutput` and `Timeout` are capability failures: the
/// judge did not produce a usable answer. `UnknownCategory` and
/// `ConfidenceOutOfRange` are contract violations: the answer parsed but
/// falls outside the rubric or the [0, 1] confidence range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    /// The claim judge failed
    #[error("Judge error for fact {fact_id}: {source}")]
    Judge {
        /// Fact being classified
        fact_id: FactId,
        /// Underlying failure
        source: CapabilityError,
    },

    /// The judge's answer is not a JSON object with category and confidence
    #[error("Malformed judge output for fact {fact_id}: {reason}")]
    MalformedOutput {
        /// Fact being classified
        fact_id: FactId,
        /// Parse failure
        reason: String,
    },

    /// The claim judge did not answer in time
    #[error("Judge timed out for fact {fact_id}")]
    Timeout {
        /// Fact being classified
        fact_id: FactId,
    },

    /// The judge returned a category outside the rubric
    #[error("Category '{category}' for fact {fact_id} is not one of: {}", .valid.join(", "))]
    UnknownCategory {
        /// Fact being classified
        fact_id: FactId,
        /// Returned category
        category: String,
        /// Rubric categories
        valid: Vec<String>,
    },

    /// The judge returned a confidence outside [0, 1]
    #[error("Confidence {confidence} for fact {fact_id} is outside [0, 1]")]
    ConfidenceOutOfRange {
        /// Fact being classified
        fact_id: FactId,
        /// Returned confidence
        confidence: f64,
    },
}

impl EvaluatorError {
    /// Whether the judge answered, but outside its contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EvaluatorError::UnknownCategory { .. } | EvaluatorError::ConfidenceOutOfRange { .. }
        )
    }

    /// The fact being classified
    pub fn fact_id(&self) -> FactId {
        match self {
            EvaluatorError::Judge { fact_id, .. }
            | EvaluatorError::MalformedOutput { fact_id, .. }
            | EvaluatorError::Timeout { fact_id }
            | EvaluatorError::UnknownCategory { fact_id, .. }
            | EvaluatorError::ConfidenceOutOfRange { fact_id, .. } => *fact_id,
        }
    }
}
