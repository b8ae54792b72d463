//! Evaluate command implementation.

use super::{build_llm, read_input};
use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use attest_extractor::DomainExampleProvider;
use attest_pipeline::{Capabilities, EvaluationPipeline};
use attest_retrieval::KeywordRetriever;
use std::sync::Arc;

/// Execute the evaluate command.
pub async fn execute_evaluate(args: EvaluateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let response = read_input(&args.input)?;

    let llm = build_llm(&config.pipeline.llm)?.ok_or_else(|| {
        CliError::Config("evaluate needs a model: set provider under [pipeline.llm]".to_string())
    })?;

    let retriever = KeywordRetriever::from_json_file(&args.knowledge_base)?.with_top_k(config.pipeline.retrieval_top_k);
    tracing::info!(
        "Loaded {} knowledge entries from {}",
        retriever.entries().len(),
        args.knowledge_base.display()
    );

    let mut pipeline_config = config.pipeline.clone();
    pipeline_config.enable_containment |= args.containment;

    let mut capabilities = Capabilities::new(llm.judge, Arc::new(retriever));
    capabilities.generator = Some(llm.generator);
    capabilities.example_provider = Some(Arc::new(DomainExampleProvider::new()));

    let pipeline = EvaluationPipeline::from_config(&pipeline_config, capabilities)?;
    let run = pipeline.evaluate(&response, args.input.context.as_deref()).await?;

    let score = run.evaluation.factuality_score;
    if args.clamp && !(0.0..=1.0).contains(&score) {
        eprintln!("{}", formatter.warning(&format!("Raw score {:.3} clamped to [0, 1]", score)));
    }
    println!("{}", formatter.format_evaluation(&run.evaluation, args.clamp)?);
    if args.metrics {
        eprintln!("\n{}", run.metrics.summary());
    }

    Ok(())
}
