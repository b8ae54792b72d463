//! Attest Domain Layer
//!
//! Core data model and capability traits for response factuality evaluation.
//! Every other crate in the workspace depends on this one; it holds no
//! infrastructure code.
//!
//! ## Key Concepts
//!
//! - **Atomic fact**: a single, minimal factual assertion taken from a response
//! - **Retrieved document**: evidence used to verify or refute a fact
//! - **Fact evaluation**: a judge's category and confidence for one fact
//! - **Scoring rubric**: category → weight, defining the valid categories
//! - **Capabilities**: claim generator, claim judge and evidence retriever
//!   traits, implemented by backend crates and injected at construction time
//!
//! ## Architecture
//!
//! - Pure data and business rules only
//! - Facts are updated by returning new values, never mutated in place
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod evaluation;
pub mod fact;
pub mod rubric;
pub mod traits;

// Re-exports for convenience
pub use error::{CapabilityError, RubricError};
pub use evaluation::{FactEvaluation, ResponseEvaluation, RetrievedDocument};
pub use fact::{AtomicFact, FactId};
pub use rubric::ScoringRubric;
pub use traits::{ClaimGenerator, ClaimJudge, EvidenceRetriever, ExampleProvider, FewShotExample};
