//! Self-containment check and repair

use crate::config::ContainmentConfig;
use crate::error::ContainmentError;
use crate::prompt::{containment_prompt, parse_yes_no, rewrite_prompt, word_set};
use attest_domain::{AtomicFact, ClaimJudge};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Decides whether facts stand on their own, and rewrites those that don't
///
/// Run [`check`](Self::check) before [`resolve`](Self::resolve): resolve
/// rewrites every fact not marked self-contained, so unchecked facts would
/// all be rewritten.
pub struct ContainmentResolver {
    judge: Option<Arc<dyn ClaimJudge>>,
    config: ContainmentConfig,
}

impl ContainmentResolver {
    /// Create a resolver without a judge (lexical check, identity resolve)
    pub fn new(config: ContainmentConfig) -> Self {
        Self { judge: None, config }
    }

    /// Resolver with default configuration and no judge
    pub fn basic() -> Self {
        Self::new(ContainmentConfig::default())
    }

    /// Use a claim judge for checks and rewrites
    pub fn with_judge(mut self, judge: Arc<dyn ClaimJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Whether a judge is configured
    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    /// Configuration in use
    pub fn config(&self) -> &ContainmentConfig {
        &self.config
    }

    /// Mark each fact self-contained or not
    ///
    /// With a judge, one yes/no request per fact. Without one, a fact is
    /// self-contained when all of its lowercase words occur in `response`.
    pub async fn check(&self, facts: &[AtomicFact], response: &str) -> Result<Vec<AtomicFact>, ContainmentError> {
        let Some(judge) = &self.judge else {
            let response_words = word_set(response);
            return Ok(facts
                .iter()
                .map(|fact| fact.with_self_contained(word_set(fact.text()).is_subset(&response_words)))
                .collect());
        };

        let mut checked = Vec::with_capacity(facts.len());
        for fact in facts {
            let prompt = containment_prompt(response, fact.text());
            let answer = self.ask(judge.as_ref(), fact, &prompt).await?;
            let self_contained = parse_yes_no(&answer);
            debug!("Fact {} self-contained: {}", fact.id(), self_contained);
            checked.push(fact.with_self_contained(self_contained));
        }

        let contained = checked
            .iter()
            .filter(|fact| fact.is_self_contained() == Some(true))
            .count();
        info!("Containment check: {}/{} facts self-contained", contained, checked.len());
        Ok(checked)
    }

    /// Rewrite every fact not marked self-contained
    ///
    /// Rewritten facts keep their id and source text and are marked
    /// self-contained. Without a judge the facts are returned unchanged.
    pub async fn resolve(
        &self,
        facts: &[AtomicFact],
        response: &str,
        context: Option<&str>,
    ) -> Result<Vec<AtomicFact>, ContainmentError> {
        let Some(judge) = &self.judge else {
            debug!("No claim judge configured, resolve is an identity pass");
            return Ok(facts.to_vec());
        };

        let mut resolved = Vec::with_capacity(facts.len());
        let mut rewritten = 0;
        for fact in facts {
            if fact.is_self_contained() == Some(true) {
                resolved.push(fact.clone());
                continue;
            }

            let prompt = rewrite_prompt(response, context, fact.text());
            let answer = self.ask(judge.as_ref(), fact, &prompt).await?;
            let text = answer.trim();
            if text.is_empty() {
                return Err(ContainmentError::InvalidRewrite {
                    fact_id: fact.id(),
                    reason: "empty rewrite".to_string(),
                });
            }
            if text.chars().count() > self.config.max_rewrite_length {
                return Err(ContainmentError::InvalidRewrite {
                    fact_id: fact.id(),
                    reason: format!("rewrite longer than {} characters", self.config.max_rewrite_length),
                });
            }

            debug!("Rewrote fact {}: '{}' -> '{}'", fact.id(), fact.text(), text);
            resolved.push(fact.with_text(text).with_self_contained(true));
            rewritten += 1;
        }

        info!("Containment resolve: rewrote {} of {} facts", rewritten, resolved.len());
        Ok(resolved)
    }

    async fn ask(&self, judge: &dyn ClaimJudge, fact: &AtomicFact, prompt: &str) -> Result<String, ContainmentError> {
        timeout(self.config.judge_timeout(), judge.generate(prompt))
            .await
            .map_err(|_| ContainmentError::Timeout { fact_id: fact.id() })?
            .map_err(|source| ContainmentError::Judge {
                fact_id: fact.id(),
                source,
            })
    }
}

impl Default for ContainmentResolver {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::CapabilityError;
    use attest_llm::MockProvider;

    const RESPONSE: &str = "Moby Dick is a novel. Melville wrote it in 1851.";

    fn facts() -> Vec<AtomicFact> {
        vec![
            AtomicFact::new("Moby Dick is a novel", RESPONSE),
            AtomicFact::new("Melville wrote it in 1851", RESPONSE),
        ]
    }

    #[tokio::test]
    async fn test_basic_check_word_subset() {
        let resolver = ContainmentResolver::basic();
        let input = vec![
            AtomicFact::new("moby DICK is a novel.", RESPONSE),
            AtomicFact::new("Herman Melville wrote it", RESPONSE),
        ];

        let checked = resolver.check(&input, RESPONSE).await.unwrap();

        // "novel." appears verbatim in the response
        assert_eq!(checked[0].is_self_contained(), Some(true));
        // "herman" is not in the response
        assert_eq!(checked[1].is_self_contained(), Some(false));
        // Inputs are untouched
        assert_eq!(input[0].is_self_contained(), None);
    }

    #[tokio::test]
    async fn test_basic_resolve_is_identity() {
        let resolver = ContainmentResolver::basic();
        let checked = resolver.check(&facts(), "unrelated").await.unwrap();

        let resolved = resolver.resolve(&checked, "unrelated", None).await.unwrap();

        assert_eq!(resolved, checked);
    }

    #[tokio::test]
    async fn test_judge_check_parses_answers() {
        let mut llm = MockProvider::default();
        llm.add_rule("Fact to check: Moby Dick", "Yes\n");
        llm.add_rule("Fact to check:", "no");
        let resolver = ContainmentResolver::basic().with_judge(Arc::new(llm.clone()));

        let checked = resolver.check(&facts(), RESPONSE).await.unwrap();

        assert_eq!(checked[0].is_self_contained(), Some(true));
        assert_eq!(checked[1].is_self_contained(), Some(false));
        assert_eq!(llm.call_count(), 2);
        assert!(llm.prompts()[0].contains(RESPONSE));
    }

    #[tokio::test]
    async fn test_judge_resolve_rewrites_only_unresolved() {
        let mut llm = MockProvider::default();
        llm.add_rule("Fact to make self-contained: Melville wrote it", "  Herman Melville wrote Moby Dick in 1851.  ");
        let resolver = ContainmentResolver::basic().with_judge(Arc::new(llm.clone()));

        let input = facts();
        let checked = vec![input[0].with_self_contained(true), input[1].with_self_contained(false)];

        let resolved = resolver
            .resolve(&checked, RESPONSE, Some("Information about Moby Dick"))
            .await
            .unwrap();

        assert_eq!(resolved[0], checked[0]);
        assert_eq!(resolved[1].text(), "Herman Melville wrote Moby Dick in 1851.");
        assert_eq!(resolved[1].is_self_contained(), Some(true));
        assert_eq!(resolved[1].id(), input[1].id());
        assert_eq!(resolved[1].source_text(), RESPONSE);
        assert_eq!(llm.call_count(), 1);
        assert!(llm.prompts()[0].contains("Context: Information about Moby Dick"));
    }

    #[tokio::test]
    async fn test_unchecked_facts_are_rewritten() {
        let llm = MockProvider::new("A rewritten fact");
        let resolver = ContainmentResolver::basic().with_judge(Arc::new(llm.clone()));

        let resolved = resolver.resolve(&facts(), RESPONSE, None).await.unwrap();

        assert!(resolved.iter().all(|f| f.text() == "A rewritten fact"));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_an_error() {
        let llm = MockProvider::new("   ");
        let resolver = ContainmentResolver::basic().with_judge(Arc::new(llm));
        let input = facts();

        let result = resolver.resolve(&input, RESPONSE, None).await;

        match result {
            Err(err @ ContainmentError::InvalidRewrite { .. }) => assert_eq!(err.fact_id(), input[0].id()),
            other => panic!("Expected InvalidRewrite, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_judge_failure_carries_fact() {
        let mut llm = MockProvider::new("yes");
        llm.add_error_rule("Fact to check: Melville");
        let resolver = ContainmentResolver::basic().with_judge(Arc::new(llm));
        let input = facts();

        let result = resolver.check(&input, RESPONSE).await;

        assert_eq!(
            result,
            Err(ContainmentError::Judge {
                fact_id: input[1].id(),
                source: CapabilityError::Other("Mock error".to_string()),
            })
        );
    }
}
