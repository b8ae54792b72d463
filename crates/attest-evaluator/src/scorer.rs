//! Aggregate factuality score

use attest_domain::{FactEvaluation, ResponseEvaluation, ScoringRubric};
use tracing::debug;

/// Confidence-weighted mean of rubric weights
///
/// `score = Σ weight(category) × confidence / n`. Unknown categories weigh
/// 0.0. The result is not clamped: rubrics with negative weights can push it
/// below zero.
#[derive(Debug, Clone, Default)]
pub struct FactualityScorer {
    rubric: ScoringRubric,
}

impl FactualityScorer {
    /// Create a scorer for a rubric
    pub fn new(rubric: ScoringRubric) -> Self {
        Self { rubric }
    }

    /// Rubric in use
    pub fn rubric(&self) -> &ScoringRubric {
        &self.rubric
    }

    /// Build the final evaluation; an empty evaluation list scores 0.0
    ///
    /// # Examples
    ///
    /// ```
    /// use attest_evaluator::FactualityScorer;
    ///
    /// let result = FactualityScorer::default().score("Nothing to see.", None, Vec::new());
    /// assert_eq!(result.factuality_score, 0.0);
    /// assert!(result.facts.is_empty());
    /// ```
    pub fn score(
        &self,
        response_text: &str,
        context: Option<&str>,
        evaluations: Vec<FactEvaluation>,
    ) -> ResponseEvaluation {
        let factuality_score = if evaluations.is_empty() {
            0.0
        } else {
            let total: f64 = evaluations
                .iter()
                .map(|evaluation| self.rubric.weight(&evaluation.category) * evaluation.confidence)
                .sum();
            total / evaluations.len() as f64
        };

        debug!("Scored {} evaluations: {:.3}", evaluations.len(), factuality_score);

        ResponseEvaluation {
            response_text: response_text.to_string(),
            context: context.map(str::to_string),
            facts: evaluations.iter().map(|evaluation| evaluation.fact.clone()).collect(),
            evaluations,
            factuality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::AtomicFact;
    use proptest::prelude::*;

    fn evaluation(category: &str, confidence: f64) -> FactEvaluation {
        FactEvaluation {
            fact: AtomicFact::new(format!("{} fact", category), "response"),
            documents: Vec::new(),
            category: category.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_empty_evaluations_floor() {
        let result = FactualityScorer::default().score("text", Some("ctx"), Vec::new());

        assert_eq!(result.factuality_score, 0.0);
        assert!(result.facts.is_empty());
        assert!(result.evaluations.is_empty());
        assert_eq!(result.context.as_deref(), Some("ctx"));
    }

    #[test]
    fn test_weighted_mean() {
        let rubric = ScoringRubric::new([("A", 1.0), ("B", 0.0)]).unwrap();
        let result = FactualityScorer::new(rubric).score(
            "text",
            None,
            vec![evaluation("A", 1.0), evaluation("B", 1.0)],
        );
        assert_eq!(result.factuality_score, 0.5);
    }

    #[test]
    fn test_confidence_weights_the_category() {
        let result = FactualityScorer::default().score(
            "text",
            None,
            vec![evaluation("supported", 0.8), evaluation("unverifiable", 1.0)],
        );
        assert!((result.factuality_score - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_category_weighs_zero() {
        let result = FactualityScorer::default().score("text", None, vec![evaluation("made_up", 1.0)]);
        assert_eq!(result.factuality_score, 0.0);
    }

    #[test]
    fn test_penalizing_rubric_goes_negative() {
        let result = FactualityScorer::new(ScoringRubric::penalizing()).score(
            "text",
            None,
            vec![evaluation("contradicted", 1.0), evaluation("no_evidence", 1.0)],
        );
        assert!((result.factuality_score - (-0.35)).abs() < 1e-12);
    }

    #[test]
    fn test_facts_follow_evaluations() {
        let evaluations = vec![evaluation("supported", 1.0), evaluation("contradicted", 0.5)];
        let expected: Vec<AtomicFact> = evaluations.iter().map(|e| e.fact.clone()).collect();

        let result = FactualityScorer::default().score("text", None, evaluations);

        assert_eq!(result.facts, expected);
        assert_eq!(result.evaluations.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_default_rubric_score_within_unit_range(
            picks in prop::collection::vec((0usize..3, 0.0f64..=1.0), 1..20)
        ) {
            let categories = ["supported", "contradicted", "unverifiable"];
            let evaluations = picks
                .into_iter()
                .map(|(idx, confidence)| evaluation(categories[idx], confidence))
                .collect();
            let score = FactualityScorer::default().score("t", None, evaluations).factuality_score;
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
