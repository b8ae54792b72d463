//! Claim classification against retrieved evidence

use crate::config::ClassifierConfig;
use crate::error::EvaluatorError;
use attest_domain::{AtomicFact, ClaimJudge, FactEvaluation, RetrievedDocument, ScoringRubric};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Raw judge answer before validation
#[derive(Debug, Deserialize)]
struct Judgment {
    category: String,
    confidence: f64,
}

/// Assigns each fact a rubric category and a confidence
///
/// The judge's answer is validated: a category outside the rubric or a
/// confidence outside [0, 1] is a typed error, never stored.
pub struct FactClassifier {
    judge: Arc<dyn ClaimJudge>,
    rubric: ScoringRubric,
    config: ClassifierConfig,
    schema: String,
}

impl FactClassifier {
    /// Create a classifier for the rubric's categories
    pub fn new(judge: Arc<dyn ClaimJudge>, rubric: ScoringRubric, config: ClassifierConfig) -> Self {
        let schema = classification_schema(&rubric);
        Self {
            judge,
            rubric,
            config,
            schema,
        }
    }

    /// Rubric whose keys are the valid categories
    pub fn rubric(&self) -> &ScoringRubric {
        &self.rubric
    }

    /// JSON schema sent with every request
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Classify one fact given its evidence
    ///
    /// Contract violations are retried up to `contract_retries` times;
    /// capability failures are returned immediately.
    pub async fn classify(
        &self,
        fact: &AtomicFact,
        documents: Vec<RetrievedDocument>,
    ) -> Result<FactEvaluation, EvaluatorError> {
        let prompt = self.build_prompt(fact, &documents);
        let mut attempt = 0;

        loop {
            match self.judge_once(fact, &prompt).await {
                Ok(judgment) => {
                    debug!(
                        "Fact {} classified as {} ({:.2})",
                        fact.id(),
                        judgment.category,
                        judgment.confidence
                    );
                    return Ok(FactEvaluation {
                        fact: fact.clone(),
                        documents,
                        category: judgment.category,
                        confidence: judgment.confidence,
                    });
                }
                Err(e) if e.is_contract_violation() && attempt < self.config.contract_retries => {
                    attempt += 1;
                    warn!(
                        "Judge broke contract for fact {} ({}), retry {}/{}",
                        fact.id(),
                        e,
                        attempt,
                        self.config.contract_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn judge_once(&self, fact: &AtomicFact, prompt: &str) -> Result<Judgment, EvaluatorError> {
        let raw = timeout(
            self.config.judge_timeout(),
            self.judge
                .generate_structured(prompt, &self.schema, self.config.system_prompt.as_deref()),
        )
        .await
        .map_err(|_| EvaluatorError::Timeout { fact_id: fact.id() })?
        .map_err(|source| EvaluatorError::Judge {
            fact_id: fact.id(),
            source,
        })?;

        let judgment: Judgment =
            serde_json::from_str(strip_code_fence(&raw)).map_err(|e| EvaluatorError::MalformedOutput {
                fact_id: fact.id(),
                reason: e.to_string(),
            })?;

        if !self.rubric.contains(&judgment.category) {
            return Err(EvaluatorError::UnknownCategory {
                fact_id: fact.id(),
                category: judgment.category,
                valid: self.rubric.categories().map(str::to_string).collect(),
            });
        }
        if !(0.0..=1.0).contains(&judgment.confidence) {
            return Err(EvaluatorError::ConfidenceOutOfRange {
                fact_id: fact.id(),
                confidence: judgment.confidence,
            });
        }

        Ok(judgment)
    }

    /// Classification prompt: claim, labelled evidence and valid categories
    pub fn build_prompt(&self, fact: &AtomicFact, documents: &[RetrievedDocument]) -> String {
        let evidence = if documents.is_empty() {
            "(no documents retrieved)".to_string()
        } else {
            documents
                .iter()
                .enumerate()
                .map(|(i, doc)| format!("Document {} [{}]: {}", i + 1, doc.source, doc.content))
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        let categories: Vec<&str> = self.rubric.categories().collect();

        format!(
            "Classify the following fact based on the retrieved documents.\n\n\
             Fact: {}\n\n\
             Retrieved Documents:\n{}\n\n\
             Available categories: {}\n\n\
             Provide your classification as JSON with 'category' and 'confidence' (0-1) fields.",
            fact.text(),
            evidence,
            categories.join(", ")
        )
    }
}

fn classification_schema(rubric: &ScoringRubric) -> String {
    let categories: Vec<&str> = rubric.categories().collect();
    json!({
        "type": "object",
        "properties": {
            "category": { "type": "string", "enum": categories },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
        },
        "required": ["category", "confidence"]
    })
    .to_string()
}

/// Strip a surrounding Markdown code fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::CapabilityError;
    use attest_llm::MockProvider;

    fn classifier(llm: &MockProvider, config: ClassifierConfig) -> FactClassifier {
        FactClassifier::new(Arc::new(llm.clone()), ScoringRubric::default(), config)
    }

    fn fact() -> AtomicFact {
        AtomicFact::new("The Eiffel Tower is in Paris", "The Eiffel Tower is in Paris.")
    }

    fn docs() -> Vec<RetrievedDocument> {
        vec![
            RetrievedDocument::new("d1", "The Eiffel Tower stands in Paris.", "Eiffel Tower", Some(1.0)),
            RetrievedDocument::new("d2", "Paris is the capital of France.", "Paris", Some(0.3)),
        ]
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_schema_lists_rubric_categories() {
        let llm = MockProvider::default();
        let schema: serde_json::Value = serde_json::from_str(classifier(&llm, ClassifierConfig::default()).schema()).unwrap();
        assert_eq!(
            schema["properties"]["category"]["enum"],
            json!(["contradicted", "supported", "unverifiable"])
        );
        assert_eq!(schema["properties"]["confidence"]["maximum"], json!(1));
    }

    #[test]
    fn test_prompt_contents() {
        let llm = MockProvider::default();
        let prompt = classifier(&llm, ClassifierConfig::default()).build_prompt(&fact(), &docs());

        assert!(prompt.contains("Fact: The Eiffel Tower is in Paris"));
        assert!(prompt.contains("Document 1 [Eiffel Tower]: The Eiffel Tower stands in Paris."));
        assert!(prompt.contains("Document 2 [Paris]: Paris is the capital of France."));
        assert!(prompt.contains("Available categories: contradicted, supported, unverifiable"));
    }

    #[test]
    fn test_prompt_without_documents() {
        let llm = MockProvider::default();
        let prompt = classifier(&llm, ClassifierConfig::default()).build_prompt(&fact(), &[]);
        assert!(prompt.contains("(no documents retrieved)"));
    }

    #[tokio::test]
    async fn test_classify_valid_answer() {
        let llm = MockProvider::default().with_structured_response("```json\n{\"category\": \"supported\", \"confidence\": 0.9}\n```");
        let input = fact();

        let evaluation = classifier(&llm, ClassifierConfig::default())
            .classify(&input, docs())
            .await
            .unwrap();

        assert_eq!(evaluation.category, "supported");
        assert_eq!(evaluation.confidence, 0.9);
        assert_eq!(evaluation.fact, input);
        assert_eq!(evaluation.documents, docs());
    }

    #[tokio::test]
    async fn test_unknown_category_is_contract_violation() {
        let llm = MockProvider::default().with_structured_response(r#"{"category": "maybe", "confidence": 0.5}"#);
        let input = fact();

        let err = classifier(&llm, ClassifierConfig::default())
            .classify(&input, docs())
            .await
            .unwrap_err();

        assert!(err.is_contract_violation());
        assert_eq!(err.fact_id(), input.id());
        assert!(matches!(err, EvaluatorError::UnknownCategory { ref category, .. } if category == "maybe"));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_confidence_out_of_range() {
        let llm = MockProvider::default().with_structured_response(r#"{"category": "supported", "confidence": 1.5}"#);

        let err = classifier(&llm, ClassifierConfig::default())
            .classify(&fact(), docs())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EvaluatorError::ConfidenceOutOfRange {
                fact_id: err.fact_id(),
                confidence: 1.5
            }
        );
    }

    #[tokio::test]
    async fn test_contract_retries_recover() {
        let llm = MockProvider::default().with_structured_response(r#"{"category": "supported", "confidence": 0.8}"#);
        llm.queue_response(r#"{"category": "SUPPORTED", "confidence": 0.8}"#);
        let config = ClassifierConfig {
            contract_retries: 1,
            ..ClassifierConfig::default()
        };

        let evaluation = classifier(&llm, config).classify(&fact(), docs()).await.unwrap();

        assert_eq!(evaluation.category, "supported");
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_contract_retries_exhausted() {
        let llm = MockProvider::default().with_structured_response(r#"{"category": "supported", "confidence": -0.1}"#);
        let config = ClassifierConfig {
            contract_retries: 2,
            ..ClassifierConfig::default()
        };

        let err = classifier(&llm, config).classify(&fact(), docs()).await.unwrap_err();

        assert!(err.is_contract_violation());
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_malformed_output_not_retried() {
        let llm = MockProvider::default().with_structured_response("supported, very sure");
        let config = ClassifierConfig {
            contract_retries: 3,
            ..ClassifierConfig::default()
        };

        let err = classifier(&llm, config).classify(&fact(), docs()).await.unwrap_err();

        assert!(matches!(err, EvaluatorError::MalformedOutput { .. }));
        assert!(!err.is_contract_violation());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_judge_failure() {
        let mut llm = MockProvider::default();
        llm.add_error_rule("Classify the following fact");

        let err = classifier(&llm, ClassifierConfig::default())
            .classify(&fact(), docs())
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluatorError::Judge { source: CapabilityError::Other(_), .. }));
    }
}
