//! Extract command implementation.

use super::{build_llm, read_input};
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use attest_extractor::{DomainExampleProvider, FactExtractor};
use std::sync::Arc;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let response = read_input(&args.input)?;

    let mut extractor = FactExtractor::new(config.pipeline.extractor.clone());
    if !args.basic {
        if let Some(llm) = build_llm(&config.pipeline.llm)? {
            extractor = extractor
                .with_generator(llm.generator)
                .with_example_provider(Arc::new(DomainExampleProvider::new()));
        }
    }
    if !extractor.has_generator() {
        eprintln!("{}", formatter.info("No LLM in use, splitting on sentences"));
    }

    let facts = extractor.extract(&response, args.input.context.as_deref()).await?;
    println!("{}", formatter.format_facts(&facts)?);

    Ok(())
}
