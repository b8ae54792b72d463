//! Dedup command implementation.

use crate::cli::DedupArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use attest_dedup::{DeduplicationStrategy, SimilarityDeduplicator};
use attest_domain::AtomicFact;
use std::fs;
use std::io::{self, Read};

/// Execute the dedup command.
pub fn execute_dedup(args: DedupArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let threshold = args.threshold.unwrap_or(config.pipeline.dedup_threshold);
    let (kept, removed) = dedup_lines(&input, threshold)?;

    println!("{}", formatter.format_facts(&kept)?);
    eprintln!("{}", formatter.success(&format!("Removed {} duplicate(s) at threshold {}", removed, threshold)));

    Ok(())
}

/// Deduplicate the non-blank lines of `input`; returns kept facts and the removed count.
pub fn dedup_lines(input: &str, threshold: f64) -> Result<(Vec<AtomicFact>, usize)> {
    let strategy = SimilarityDeduplicator::new(threshold).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let facts: Vec<AtomicFact> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| AtomicFact::new(line, input))
        .collect();
    let total = facts.len();

    let kept = strategy.deduplicate(facts);
    let removed = total - kept.len();
    Ok((kept, removed))
}
