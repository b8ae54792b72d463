//! Relevance of facts to the context a response was written for
//!
//! Not a pipeline stage. Callers run it on extracted facts when they want
//! to filter or report off-topic claims.

use crate::config::ContainmentConfig;
use crate::error::ContainmentError;
use crate::prompt::{parse_yes_no, relevance_prompt, word_set};
use attest_domain::{AtomicFact, ClaimJudge};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::info;

/// Sets `is_relevant` on facts
pub struct RelevanceChecker {
    judge: Option<Arc<dyn ClaimJudge>>,
    config: ContainmentConfig,
}

impl RelevanceChecker {
    /// Create a checker without a judge (word overlap)
    pub fn new(config: ContainmentConfig) -> Self {
        Self { judge: None, config }
    }

    /// Use a claim judge for yes/no relevance questions
    pub fn with_judge(mut self, judge: Arc<dyn ClaimJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Mark each fact relevant or not to `context`
    ///
    /// Without a judge, a fact is relevant when it shares at least one
    /// lowercase word with the context.
    pub async fn check(&self, facts: &[AtomicFact], context: &str) -> Result<Vec<AtomicFact>, ContainmentError> {
        let checked = match &self.judge {
            None => {
                let context_words = word_set(context);
                facts
                    .iter()
                    .map(|fact| fact.with_relevance(!word_set(fact.text()).is_disjoint(&context_words)))
                    .collect::<Vec<_>>()
            }
            Some(judge) => {
                let mut checked = Vec::with_capacity(facts.len());
                for fact in facts {
                    let prompt = relevance_prompt(context, fact.text());
                    let answer = timeout(self.config.judge_timeout(), judge.generate(&prompt))
                        .await
                        .map_err(|_| ContainmentError::Timeout { fact_id: fact.id() })?
                        .map_err(|source| ContainmentError::Judge {
                            fact_id: fact.id(),
                            source,
                        })?;
                    checked.push(fact.with_relevance(parse_yes_no(&answer)));
                }
                checked
            }
        };

        let relevant = checked.iter().filter(|f| f.is_relevant() == Some(true)).count();
        info!("Relevance check: {}/{} facts relevant", relevant, checked.len());
        Ok(checked)
    }
}

impl Default for RelevanceChecker {
    fn default() -> Self {
        Self::new(ContainmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_llm::MockProvider;

    #[tokio::test]
    async fn test_basic_word_overlap() {
        let checker = RelevanceChecker::default();
        let facts = vec![
            AtomicFact::new("Melville wrote Moby Dick", ""),
            AtomicFact::new("Bananas are yellow", ""),
        ];

        let checked = checker.check(&facts, "Information about the novel moby dick").await.unwrap();

        assert_eq!(checked[0].is_relevant(), Some(true));
        assert_eq!(checked[1].is_relevant(), Some(false));
        assert_eq!(checked[0].is_self_contained(), None);
    }

    #[tokio::test]
    async fn test_judge_answers() {
        let mut llm = MockProvider::new("no");
        llm.add_rule("Fact: Melville", "yes");
        let checker = RelevanceChecker::default().with_judge(Arc::new(llm.clone()));
        let facts = vec![
            AtomicFact::new("Melville wrote Moby Dick", ""),
            AtomicFact::new("Bananas are yellow", ""),
        ];

        let checked = checker.check(&facts, "Moby Dick").await.unwrap();

        assert_eq!(checked[0].is_relevant(), Some(true));
        assert_eq!(checked[1].is_relevant(), Some(false));
        assert!(llm.prompts()[0].contains("Context: Moby Dick"));
    }
}
