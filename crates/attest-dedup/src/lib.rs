//! Attest Fact Deduplication
//!
//! Similarity scoring and near-duplicate elimination for extracted facts.
//!
//! ## Components
//!
//! - [`similarity`]: symmetric longest-matching-block ratio over lowercased text
//! - [`deduplicate`]: greedy, order-preserving, first-seen-wins removal
//! - [`DeduplicationStrategy`]: seam for alternative policies
//!
//! # Examples
//!
//! ```
//! use attest_dedup::{DeduplicationStrategy, SimilarityDeduplicator};
//! use attest_domain::AtomicFact;
//!
//! let strategy = SimilarityDeduplicator::new(0.9).unwrap();
//! let facts = vec![
//!     AtomicFact::new("Water boils at 100 degrees", ""),
//!     AtomicFact::new("water boils at 100 degrees", ""),
//! ];
//! assert_eq!(strategy.deduplicate(facts).len(), 1);
//! ```

#![warn(missing_docs)]

pub mod dedup;
pub mod similarity;

use thiserror::Error;

pub use dedup::{deduplicate, DeduplicationStrategy, SimilarityDeduplicator, DEFAULT_THRESHOLD};
pub use similarity::similarity;

/// Errors raised when configuring deduplication
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DedupError {
    /// Threshold outside `[0.0, 1.0]` or NaN
    #[error("Similarity threshold must be within [0.0, 1.0], got {0}")]
    InvalidThreshold(f64),
}
