//! Metrics collected during a pipeline run

use crate::error::Stage;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counts and timings for one pipeline run
///
/// Durations for retrieval and classification are summed over facts, so
/// with `max_concurrency > 1` they can exceed the wall-clock total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Facts returned by the extractor
    pub facts_extracted: usize,

    /// Facts whose text the containment resolver rewrote
    pub facts_rewritten: usize,

    /// Facts removed as near-duplicates
    pub duplicates_removed: usize,

    /// Facts that were classified
    pub facts_evaluated: usize,

    /// Evaluations per category
    pub category_counts: BTreeMap<String, usize>,

    /// Time spent per stage
    pub stage_durations: BTreeMap<Stage, Duration>,

    /// Wall-clock time for the whole run
    pub total_duration: Duration,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add time spent in a stage
    pub fn record_stage(&mut self, stage: Stage, duration: Duration) {
        *self.stage_durations.entry(stage).or_default() += duration;
    }

    /// Time recorded for a stage, if it ran
    pub fn stage_duration(&self, stage: Stage) -> Option<Duration> {
        self.stage_durations.get(&stage).copied()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Run Metrics Summary".to_string(),
            "===================".to_string(),
            format!("Facts extracted: {}", self.facts_extracted),
            format!("Facts rewritten: {}", self.facts_rewritten),
            format!("Duplicates removed: {}", self.duplicates_removed),
            format!("Facts evaluated: {}", self.facts_evaluated),
            format!("Total time: {:.2?}", self.total_duration),
        ];

        if !self.category_counts.is_empty() {
            lines.push(String::new());
            lines.push("Categories:".to_string());
            for (category, count) in &self.category_counts {
                lines.push(format!("  {}: {}", category, count));
            }
        }

        if !self.stage_durations.is_empty() {
            lines.push(String::new());
            lines.push("Stage timings:".to_string());
            for (stage, duration) in &self.stage_durations {
                lines.push(format!("  {}: {:.2?}", stage, duration));
            }
        }

        lines.join("\n")
    }
}
