//! Evidence and judgment records produced by a pipeline run

use crate::AtomicFact;
use std::collections::BTreeMap;

/// A document retrieved as evidence for a fact
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedDocument {
    /// Document identifier
    pub id: String,

    /// Evidence text
    pub content: String,

    /// Provenance label or knowledge-base key
    pub source: String,

    /// Relevance score (higher is more relevant), if the retriever provides one
    pub relevance_score: Option<f64>,
}

impl RetrievedDocument {
    /// Create a new document
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        relevance_score: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source: source.into(),
            relevance_score,
        }
    }
}

/// Judgment for one fact, created once by the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct FactEvaluation {
    /// The fact that was judged
    pub fact: AtomicFact,

    /// Evidence used for the judgment
    pub documents: Vec<RetrievedDocument>,

    /// Rubric category assigned by the judge
    pub category: String,

    /// Judge confidence in [0.0, 1.0]
    pub confidence: f64,
}

/// Terminal output of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEvaluation {
    /// The evaluated response
    pub response_text: String,

    /// Optional context the response was produced for
    pub context: Option<String>,

    /// Final fact set, after containment repair and deduplication
    pub facts: Vec<AtomicFact>,

    /// One evaluation per fact; `evaluations[i]` judges `facts[i]`
    pub evaluations: Vec<FactEvaluation>,

    /// Aggregate factuality score
    pub factuality_score: f64,
}

impl ResponseEvaluation {
    /// Number of evaluations per category
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for evaluation in &self.evaluations {
            *counts.entry(evaluation.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}
