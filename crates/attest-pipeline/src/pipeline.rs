//! Evaluation orchestrator

use crate::config::{PipelineConfig, DEFAULT_RETRIEVAL_TOP_K};
use crate::error::{PipelineError, Stage};
use crate::metrics::RunMetrics;
use attest_containment::ContainmentResolver;
use attest_dedup::{DeduplicationStrategy, SimilarityDeduplicator};
use attest_domain::{
    AtomicFact, ClaimGenerator, ClaimJudge, EvidenceRetriever, ExampleProvider, FactEvaluation, ResponseEvaluation,
};
use attest_evaluator::{FactClassifier, FactualityScorer};
use attest_extractor::FactExtractor;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

/// Components a pipeline runs
///
/// Containment is optional; deduplication always runs.
pub struct PipelineComponents {
    /// Claim extractor
    pub extractor: FactExtractor,
    /// Containment resolver; `None` skips both containment stages
    pub containment: Option<ContainmentResolver>,
    /// Deduplication policy
    pub deduplicator: Arc<dyn DeduplicationStrategy>,
    /// Evidence retriever
    pub retriever: Arc<dyn EvidenceRetriever>,
    /// Claim classifier
    pub classifier: FactClassifier,
    /// Factuality scorer
    pub scorer: FactualityScorer,
}

/// Capabilities used to build a pipeline from a [`PipelineConfig`]
pub struct Capabilities {
    /// Claim judge for containment and classification
    pub judge: Arc<dyn ClaimJudge>,
    /// Evidence retriever
    pub retriever: Arc<dyn EvidenceRetriever>,
    /// Claim generator for extraction; `None` splits on sentences
    pub generator: Option<Arc<dyn ClaimGenerator>>,
    /// Few-shot examples for extraction prompts
    pub example_provider: Option<Arc<dyn ExampleProvider>>,
    /// Deduplication policy; `None` uses [`SimilarityDeduplicator`]
    pub deduplicator: Option<Arc<dyn DeduplicationStrategy>>,
}

impl Capabilities {
    /// Judge and retriever only
    pub fn new(judge: Arc<dyn ClaimJudge>, retriever: Arc<dyn EvidenceRetriever>) -> Self {
        Self {
            judge,
            retriever,
            generator: None,
            example_provider: None,
            deduplicator: None,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The response evaluation
    pub evaluation: ResponseEvaluation,
    /// Counts and timings for the run
    pub metrics: RunMetrics,
}

/// Runs extract, containment, dedup, per-fact retrieve and classify, and score
///
/// Stages run in a fixed order. Any stage failure aborts the run; nothing is
/// retried here. A pipeline holds no per-run state and can be shared across
/// concurrent runs.
pub struct EvaluationPipeline {
    components: PipelineComponents,
    retrieval_top_k: usize,
    max_concurrency: usize,
}

impl EvaluationPipeline {
    /// Create a pipeline from explicit components
    pub fn new(components: PipelineComponents) -> Self {
        Self {
            components,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
            max_concurrency: 1,
        }
    }

    /// Build every component from configuration
    pub fn from_config(config: &PipelineConfig, capabilities: Capabilities) -> Result<Self, PipelineError> {
        config.validate()?;
        let rubric = config.rubric()?;

        let mut extractor = FactExtractor::new(config.extractor.clone());
        if let Some(generator) = capabilities.generator {
            extractor = extractor.with_generator(generator);
        }
        if let Some(provider) = capabilities.example_provider {
            extractor = extractor.with_example_provider(provider);
        }

        let containment = config.enable_containment.then(|| {
            ContainmentResolver::new(config.containment.clone()).with_judge(Arc::clone(&capabilities.judge))
        });

        let deduplicator = match capabilities.deduplicator {
            Some(strategy) => strategy,
            None => Arc::new(
                SimilarityDeduplicator::new(config.dedup_threshold)
                    .map_err(|e| PipelineError::Config(e.to_string()))?,
            ),
        };

        let components = PipelineComponents {
            extractor,
            containment,
            deduplicator,
            retriever: capabilities.retriever,
            classifier: FactClassifier::new(capabilities.judge, rubric.clone(), config.classifier.clone()),
            scorer: FactualityScorer::new(rubric),
        };

        Ok(Self::new(components)
            .with_retrieval_top_k(config.retrieval_top_k)
            .with_max_concurrency(config.max_concurrency))
    }

    /// Documents kept per fact (at least 1)
    pub fn with_retrieval_top_k(mut self, top_k: usize) -> Self {
        self.retrieval_top_k = top_k.max(1);
        self
    }

    /// Facts retrieved and classified at once (at least 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Components in use
    pub fn components(&self) -> &PipelineComponents {
        &self.components
    }

    /// Evaluate one response
    pub async fn evaluate(&self, response: &str, context: Option<&str>) -> Result<PipelineRun, PipelineError> {
        let span = info_span!(
            "evaluate",
            response_len = response.chars().count(),
            has_context = context.is_some()
        );
        self.run(response, context).instrument(span).await
    }

    async fn run(&self, response: &str, context: Option<&str>) -> Result<PipelineRun, PipelineError> {
        let started = Instant::now();
        let mut metrics = RunMetrics::new();

        let stage_start = Instant::now();
        let mut facts = self.components.extractor.extract(response, context).await?;
        metrics.facts_extracted = facts.len();
        metrics.record_stage(Stage::Extract, stage_start.elapsed());
        info!(stage = %Stage::Extract, facts = facts.len(), "Stage complete");

        if let Some(resolver) = &self.components.containment {
            let stage_start = Instant::now();
            let checked = resolver
                .check(&facts, response)
                .await
                .map_err(|source| PipelineError::Containment {
                    stage: Stage::CheckContainment,
                    source,
                })?;
            metrics.record_stage(Stage::CheckContainment, stage_start.elapsed());
            info!(stage = %Stage::CheckContainment, facts = checked.len(), "Stage complete");

            let stage_start = Instant::now();
            let resolved = resolver
                .resolve(&checked, response, context)
                .await
                .map_err(|source| PipelineError::Containment {
                    stage: Stage::ResolveContainment,
                    source,
                })?;
            metrics.facts_rewritten = checked
                .iter()
                .zip(&resolved)
                .filter(|(before, after)| before.text() != after.text())
                .count();
            metrics.record_stage(Stage::ResolveContainment, stage_start.elapsed());
            info!(
                stage = %Stage::ResolveContainment,
                rewritten = metrics.facts_rewritten,
                "Stage complete"
            );
            facts = resolved;
        }

        let stage_start = Instant::now();
        let before = facts.len();
        let facts = self.components.deduplicator.deduplicate(facts);
        metrics.duplicates_removed = before.saturating_sub(facts.len());
        metrics.record_stage(Stage::Deduplicate, stage_start.elapsed());
        info!(stage = %Stage::Deduplicate, facts = facts.len(), removed = metrics.duplicates_removed, "Stage complete");

        // `buffered` yields in input order, so evaluations[i] judges facts[i]
        let results: Vec<(FactEvaluation, Duration, Duration)> = stream::iter(facts.iter())
            .map(|fact| self.evaluate_fact(fact))
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        let mut evaluations = Vec::with_capacity(results.len());
        for (evaluation, retrieve_time, classify_time) in results {
            metrics.record_stage(Stage::Retrieve, retrieve_time);
            metrics.record_stage(Stage::Classify, classify_time);
            evaluations.push(evaluation);
        }
        metrics.facts_evaluated = evaluations.len();
        info!(stage = %Stage::Classify, facts = evaluations.len(), "Stage complete");

        let stage_start = Instant::now();
        let evaluation = self.components.scorer.score(response, context, evaluations);
        metrics.record_stage(Stage::Score, stage_start.elapsed());
        metrics.category_counts = evaluation.category_counts();
        metrics.total_duration = started.elapsed();

        info!(
            score = evaluation.factuality_score,
            facts = evaluation.facts.len(),
            "Evaluation complete in {:.2?}",
            metrics.total_duration
        );

        Ok(PipelineRun { evaluation, metrics })
    }

    async fn evaluate_fact(&self, fact: &AtomicFact) -> Result<(FactEvaluation, Duration, Duration), PipelineError> {
        let retrieve_start = Instant::now();
        let mut documents = self
            .components
            .retriever
            .retrieve(fact)
            .await
            .map_err(|source| PipelineError::Retrieval {
                fact_id: fact.id(),
                source,
            })?;
        if documents.len() > self.retrieval_top_k {
            warn!(
                "Retriever returned {} documents for fact {}, keeping {}",
                documents.len(),
                fact.id(),
                self.retrieval_top_k
            );
            documents.truncate(self.retrieval_top_k);
        }
        let retrieve_time = retrieve_start.elapsed();
        debug!("Retrieved {} documents for fact {}", documents.len(), fact.id());

        let classify_start = Instant::now();
        let evaluation = self.components.classifier.classify(fact, documents).await?;
        Ok((evaluation, retrieve_time, classify_start.elapsed()))
    }
}
