//! Near-duplicate elimination
//!
//! The default strategy is greedy and first-seen-wins: each fact is compared
//! against the facts kept so far and dropped at the first comparison that
//! meets the threshold. Other policies plug in through
//! [`DeduplicationStrategy`], which plain closures also implement.

use crate::similarity::similarity;
use crate::DedupError;
use attest_domain::AtomicFact;
use tracing::debug;

/// Default similarity threshold at which two facts are duplicates
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// A deduplication policy
///
/// Implementations must return a subsequence of the input: facts are
/// dropped, never reordered or rewritten.
pub trait DeduplicationStrategy: Send + Sync {
    /// Remove near-duplicates from `facts`
    fn deduplicate(&self, facts: Vec<AtomicFact>) -> Vec<AtomicFact>;
}

impl<F> DeduplicationStrategy for F
where
    F: Fn(Vec<AtomicFact>) -> Vec<AtomicFact> + Send + Sync,
{
    fn deduplicate(&self, facts: Vec<AtomicFact>) -> Vec<AtomicFact> {
        self(facts)
    }
}

/// Greedy first-seen-wins deduplicator over [`similarity`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityDeduplicator {
    threshold: f64,
}

impl SimilarityDeduplicator {
    /// Create a deduplicator with a threshold in `[0.0, 1.0]`
    pub fn new(threshold: f64) -> Result<Self, DedupError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DedupError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    /// Similarity at or above which a fact is dropped
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for SimilarityDeduplicator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DeduplicationStrategy for SimilarityDeduplicator {
    fn deduplicate(&self, facts: Vec<AtomicFact>) -> Vec<AtomicFact> {
        deduplicate(facts, self.threshold)
    }
}

/// Greedy, order-preserving near-duplicate removal
///
/// A threshold of `1.0` only removes facts identical after lowercasing; `0.0`
/// keeps only the first fact. Runs in O(n²) comparisons.
///
/// No two retained facts reach `threshold` against each other. The retained
/// count is not monotonic in `threshold` for every input, since a fact
/// surviving at a higher threshold can absorb later facts.
///
/// # Examples
///
/// ```
/// use attest_dedup::deduplicate;
/// use attest_domain::AtomicFact;
///
/// let facts = vec![
///     AtomicFact::new("The Eiffel Tower is located in Paris, France.", ""),
///     AtomicFact::new("The Eiffel Tower is in Paris, France.", ""),
///     AtomicFact::new("Rome is the capital city of Italy.", ""),
/// ];
///
/// let unique = deduplicate(facts, 0.85);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[1].text(), "Rome is the capital city of Italy.");
/// ```
pub fn deduplicate(facts: Vec<AtomicFact>, threshold: f64) -> Vec<AtomicFact> {
    let total = facts.len();
    let mut kept: Vec<AtomicFact> = Vec::with_capacity(total);

    for fact in facts {
        let duplicate = kept
            .iter()
            .any(|existing| similarity(fact.text(), existing.text()) >= threshold);
        if !duplicate {
            kept.push(fact);
        }
    }

    debug!("Deduplicated {} facts to {} at threshold {}", total, kept.len(), threshold);
    kept
}
