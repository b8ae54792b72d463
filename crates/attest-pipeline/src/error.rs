//! Error types for pipeline runs

use attest_containment::ContainmentError;
use attest_domain::{CapabilityError, FactId};
use attest_evaluator::EvaluatorError;
use attest_extractor::ExtractorError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Claim extraction
    Extract,
    /// Self-containment check
    CheckContainment,
    /// Self-containment repair
    ResolveContainment,
    /// Near-duplicate removal
    Deduplicate,
    /// Evidence retrieval for one fact
    Retrieve,
    /// Classification of one fact
    Classify,
    /// Aggregate scoring
    Score,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::CheckContainment => "check_containment",
            Stage::ResolveContainment => "resolve_containment",
            Stage::Deduplicate => "deduplicate",
            Stage::Retrieve => "retrieve",
            Stage::Classify => "classify",
            Stage::Score => "score",
        };
        f.write_str(name)
    }
}

/// Errors that abort a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Configuration is invalid or incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim extraction failed
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// Containment check or repair failed
    #[error("{stage} failed: {source}")]
    Containment {
        /// Containment stage that failed
        stage: Stage,
        /// Underlying error
        source: ContainmentError,
    },

    /// Evidence retrieval failed for a fact
    #[error("Retrieval failed for fact {fact_id}: {source}")]
    Retrieval {
        /// Fact being retrieved for
        fact_id: FactId,
        /// Underlying error
        source: CapabilityError,
    },

    /// Classification failed for a fact
    #[error("Classification failed: {0}")]
    Classification(#[from] EvaluatorError),
}

impl PipelineError {
    /// Stage that failed; `None` for configuration errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Config(_) => None,
            PipelineError::Extraction(_) => Some(Stage::Extract),
            PipelineError::Containment { stage, .. } => Some(*stage),
            PipelineError::Retrieval { .. } => Some(Stage::Retrieve),
            PipelineError::Classification(_) => Some(Stage::Classify),
        }
    }

    /// Offending fact, when the failure is tied to one
    pub fn fact_id(&self) -> Option<FactId> {
        match self {
            PipelineError::Config(_) | PipelineError::Extraction(_) => None,
            PipelineError::Containment { source, .. } => Some(source.fact_id()),
            PipelineError::Retrieval { fact_id, .. } => Some(*fact_id),
            PipelineError::Classification(e) => Some(e.fact_id()),
        }
    }

    /// Whether the judge broke the classification contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PipelineError::Classification(e) if e.is_contract_violation())
    }
}
