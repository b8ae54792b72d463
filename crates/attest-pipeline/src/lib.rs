//! Attest Pipeline
//!
//! Orchestrates a factuality evaluation run over the component crates.
//!
//! # Overview
//!
//! ```text
//! EXTRACT → [CHECK_CONTAINMENT → RESOLVE_CONTAINMENT]? → DEDUPLICATE
//!         → (RETRIEVE → CLASSIFY)* → SCORE
//! ```
//!
//! - Containment runs only when a resolver is configured
//! - Deduplication always runs, with the default or an injected strategy
//! - Per-fact retrieve+classify units may run concurrently
//!   (`max_concurrency`); output order always follows the deduplicated facts
//! - Any stage failure aborts the run with a [`PipelineError`] naming the
//!   [`Stage`] and, where there is one, the offending fact
//!
//! # Usage
//!
//! ```
//! use attest_llm::MockProvider;
//! use attest_pipeline::{Capabilities, EvaluationPipeline, PipelineConfig};
//! use attest_retrieval::KeywordRetriever;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let judge = MockProvider::default()
//!     .with_structured_response(r#"{"category": "supported", "confidence": 1.0}"#);
//! let retriever = KeywordRetriever::new([("Paris", "Paris is the capital of France.")]);
//!
//! let pipeline = EvaluationPipeline::from_config(
//!     &PipelineConfig::default(),
//!     Capabilities::new(Arc::new(judge), Arc::new(retriever)),
//! )?;
//!
//! let run = pipeline.evaluate("Paris is the capital of France.", None).await?;
//! assert_eq!(run.evaluation.factuality_score, 1.0);
//! println!("{}", run.metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! dedup_threshold = 0.85
//! retrieval_top_k = 3
//! max_concurrency = 1
//! enable_containment = false
//!
//! [rubric]
//! supported = 1.0
//! unverifiable = 0.5
//! contradicted = 0.0
//!
//! [classifier]
//! judge_timeout_secs = 60
//! contract_retries = 0
//!
//! [llm]
//! provider = "ollama"
//! model = "llama3"
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod pipeline;

pub use config::{LlmSettings, PipelineConfig, ProviderKind, DEFAULT_DEDUP_THRESHOLD, DEFAULT_RETRIEVAL_TOP_K};
pub use error::{PipelineError, Stage};
pub use metrics::RunMetrics;
pub use pipeline::{Capabilities, EvaluationPipeline, PipelineComponents, PipelineRun};
