//! Containment error types

use attest_domain::{CapabilityError, FactId};
use thiserror::Error;

/// Errors that can occur while checking or resolving facts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainmentError {
    /// The claim judge failed
    #[error("Judge error for fact {fact_id}: {source}")]
    Judge {
        /// Fact being judged
        fact_id: FactId,
        /// Underlying failure
        source: CapabilityError,
    },

    /// The claim judge did not answer in time
    #[error("Judge timed out for fact {fact_id}")]
    Timeout {
        /// Fact being judged
        fact_id: FactId,
    },

    /// The rewrite was empty or exceeded the configured length
    #[error("Unusable rewrite for fact {fact_id}: {reason}")]
    InvalidRewrite {
        /// Fact being rewritten
        fact_id: FactId,
        /// What was wrong with it
        reason: String,
    },
}

impl ContainmentError {
    /// The fact that triggered the error
    pub fn fact_id(&self) -> FactId {
        match self {
            ContainmentError::Judge { fact_id, .. }
            | ContainmentError::Timeout { fact_id }
            | ContainmentError::InvalidRewrite { fact_id, .. } => *fact_id,
        }
    }
}
