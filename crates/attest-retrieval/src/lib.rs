//! Attest Evidence Retrieval
//!
//! Keyword-matching retriever over an in-memory knowledge base. Good enough
//! for demos and tests; real deployments plug their own
//! [`EvidenceRetriever`] into the pipeline.
//!
//! # Examples
//!
//! ```
//! use attest_retrieval::KeywordRetriever;
//! use attest_domain::{AtomicFact, EvidenceRetriever};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retriever = KeywordRetriever::new([
//!     ("Moby Dick", "Moby Dick is a novel by Herman Melville published in 1851."),
//! ]);
//!
//! let fact = AtomicFact::new("Melville wrote Moby Dick", "Melville wrote Moby Dick.");
//! let docs = retriever.retrieve(&fact).await.unwrap();
//! assert_eq!(docs[0].source, "Moby Dick");
//! # }
//! ```

#![warn(missing_docs)]

use async_trait::async_trait;
use attest_domain::{AtomicFact, CapabilityError, EvidenceRetriever, RetrievedDocument};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default number of documents returned per fact
pub const DEFAULT_TOP_K: usize = 3;

/// Words that never count as query terms
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "in", "on", "at", "by", "and", "or", "for", "with", "to", "from",
];

/// Errors raised while building a retriever
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Knowledge base file could not be read
    #[error("Failed to read knowledge base: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge base file is not a JSON object of strings
    #[error("Invalid knowledge base: {0}")]
    Format(String),
}

impl From<RetrievalError> for CapabilityError {
    fn from(e: RetrievalError) -> Self {
        match e {
            RetrievalError::Io(err) => CapabilityError::Unavailable(err.to_string()),
            RetrievalError::Format(msg) => CapabilityError::Malformed(msg),
        }
    }
}

/// One knowledge base entry
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    /// Title or lookup key, reported as the document source
    pub key: String,
    /// Evidence text
    pub content: String,
}

/// Keyword-overlap retriever
///
/// Relevance of an entry is the share of query terms found (as substrings)
/// in `key + " " + content`, lowercased. Query terms are the fact's word
/// tokens minus stop words and tokens of two characters or fewer.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    entries: Vec<KnowledgeEntry>,
    top_k: usize,
}

impl KeywordRetriever {
    /// Build a retriever from `(key, content)` pairs, in iteration order
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, content)| KnowledgeEntry {
                    key: key.into(),
                    content: content.into(),
                })
                .collect(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Load a knowledge base from a JSON object mapping keys to contents
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse a knowledge base from a JSON object string
    pub fn from_json_str(raw: &str) -> Result<Self, RetrievalError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| RetrievalError::Format(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| RetrievalError::Format("expected a JSON object".to_string()))?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, content) in object {
            let content = content
                .as_str()
                .ok_or_else(|| RetrievalError::Format(format!("value for '{}' is not a string", key)))?;
            entries.push((key.clone(), content.to_string()));
        }

        Ok(Self::new(entries))
    }

    /// Set the maximum number of documents per fact
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Maximum number of documents per fact
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Knowledge base entries
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Rank entries for a query text without building documents
    pub fn search(&self, text: &str) -> Vec<(&KnowledgeEntry, f64)> {
        let terms = query_terms(text);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&KnowledgeEntry, f64)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let haystack = format!("{} {}", entry.key, entry.content).to_lowercase();
                let hits = terms.iter().filter(|term| haystack.contains(term.as_str())).count();
                (hits > 0).then(|| (entry, hits as f64 / terms.len() as f64))
            })
            .collect();

        // Stable: equal scores keep knowledge base order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.top_k);
        scored
    }
}

#[async_trait]
impl EvidenceRetriever for KeywordRetriever {
    async fn retrieve(&self, fact: &AtomicFact) -> Result<Vec<RetrievedDocument>, CapabilityError> {
        let documents: Vec<RetrievedDocument> = self
            .search(fact.text())
            .into_iter()
            .map(|(entry, score)| {
                RetrievedDocument::new(
                    uuid::Uuid::now_v7().to_string(),
                    entry.content.clone(),
                    entry.key.clone(),
                    Some(score),
                )
            })
            .collect();

        debug!("Retrieved {} documents for fact {}", documents.len(), fact.id());
        Ok(documents)
    }
}

/// Lowercase word tokens of `text`, minus stop words and short tokens
fn query_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}
