//! Attest Evaluator
//!
//! Per-fact classification against evidence, and aggregation of the
//! classifications into a factuality score.
//!
//! # Components
//!
//! - [`FactClassifier`]: asks a [`ClaimJudge`](attest_domain::ClaimJudge)
//!   for `{category, confidence}` and validates the answer against the rubric
//! - [`FactualityScorer`]: confidence-weighted mean of rubric weights

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod scorer;

pub use classifier::FactClassifier;
pub use config::ClassifierConfig;
pub use error::EvaluatorError;
pub use scorer::FactualityScorer;
