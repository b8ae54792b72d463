//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between the evaluation pipeline and its
//! backends. Implementations live in other crates (attest-llm,
//! attest-retrieval) and are injected at construction time.

use crate::error::CapabilityError;
use crate::{AtomicFact, RetrievedDocument};
use async_trait::async_trait;

/// Free-text generation, used to extract claims
///
/// Implemented by the infrastructure layer (attest-llm)
#[async_trait]
pub trait ClaimGenerator: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError>;
}

/// Judgment capability: free-text yes/no and rewrite prompts through
/// [`ClaimGenerator::generate`], plus structured output for classification
///
/// Implemented by the infrastructure layer (attest-llm)
#[async_trait]
pub trait ClaimJudge: ClaimGenerator {
    /// Generate output conforming to a JSON schema
    ///
    /// `schema` is a JSON Schema document; the returned string is expected to
    /// be a JSON value matching it. Callers validate the value themselves.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CapabilityError>;
}

/// Evidence lookup for a single fact
///
/// Implementations return documents sorted by descending relevance and
/// truncated to their configured top-k.
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// Retrieve documents relevant to the fact
    async fn retrieve(&self, fact: &AtomicFact) -> Result<Vec<RetrievedDocument>, CapabilityError>;
}

/// A worked extraction example shown to the generator
#[derive(Debug, Clone, PartialEq)]
pub struct FewShotExample {
    /// Example input text
    pub text: String,

    /// Facts that should be extracted from `text`
    pub facts: Vec<String>,
}

impl FewShotExample {
    /// Create a new example
    pub fn new<I, S>(text: impl Into<String>, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            facts: facts.into_iter().map(Into::into).collect(),
        }
    }
}

/// Supplies few-shot examples for an extraction request
///
/// Selecting examples for a domain is the provider's job, never the
/// extractor's. Plain closures with the matching signature implement this
/// trait.
pub trait ExampleProvider: Send + Sync {
    /// Examples for the given response and optional context
    fn provide_examples(&self, response: &str, context: Option<&str>) -> Vec<FewShotExample>;
}

impl<F> ExampleProvider for F
where
    F: Fn(&str, Option<&str>) -> Vec<FewShotExample> + Send + Sync,
{
    fn provide_examples(&self, response: &str, context: Option<&str>) -> Vec<FewShotExample> {
        self(response, context)
    }
}
