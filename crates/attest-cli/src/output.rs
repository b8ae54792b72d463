//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use attest_domain::{AtomicFact, ResponseEvaluation};
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Format a list of facts.
    pub fn format_facts(&self, facts: &[AtomicFact]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let facts: Vec<serde_json::Value> = facts.iter().map(fact_json).collect();
                Ok(serde_json::to_string_pretty(&facts)?)
            }
            OutputFormat::Table => Ok(self.format_facts_table(facts)),
        }
    }

    fn format_facts_table(&self, facts: &[AtomicFact]) -> String {
        if facts.is_empty() {
            return self.colorize("No facts found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Fact"]);
        for (idx, fact) in facts.iter().enumerate() {
            builder.push_record([(idx + 1).to_string(), fact.text().to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a response evaluation; `clamp` limits the reported score to [0, 1].
    pub fn format_evaluation(&self, evaluation: &ResponseEvaluation, clamp: bool) -> Result<String> {
        let score = reported_score(evaluation.factuality_score, clamp);
        match self.format {
            OutputFormat::Json => {
                let facts: Vec<serde_json::Value> = evaluation
                    .evaluations
                    .iter()
                    .map(|e| {
                        json!({
                            "fact": fact_json(&e.fact),
                            "category": e.category,
                            "confidence": e.confidence,
                            "documents": e.documents.iter().map(|d| json!({
                                "id": d.id,
                                "source": d.source,
                                "content": d.content,
                                "relevance_score": d.relevance_score,
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                let output = json!({
                    "response": evaluation.response_text,
                    "context": evaluation.context,
                    "factuality_score": score,
                    "category_counts": evaluation.category_counts(),
                    "evaluations": facts,
                });
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Table => Ok(self.format_evaluation_table(evaluation, score)),
        }
    }

    fn format_evaluation_table(&self, evaluation: &ResponseEvaluation, score: f64) -> String {
        let mut lines = Vec::new();

        if evaluation.evaluations.is_empty() {
            lines.push(self.colorize("No facts found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["#", "Fact", "Category", "Confidence", "Evidence"]);
            for (idx, e) in evaluation.evaluations.iter().enumerate() {
                let sources: Vec<&str> = e.documents.iter().map(|d| d.source.as_str()).collect();
                builder.push_record([
                    (idx + 1).to_string(),
                    e.fact.text().to_string(),
                    e.category.clone(),
                    format!("{:.2}", e.confidence),
                    if sources.is_empty() { "-".to_string() } else { sources.join(", ") },
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            lines.push(table.to_string());
        }

        let color = if score >= 0.7 {
            "green"
        } else if score >= 0.4 {
            "yellow"
        } else {
            "red"
        };
        lines.push(format!(
            "Factuality score: {}",
            self.colorize(&format!("{:.3}", score), color)
        ));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Score as reported to the user; the pipeline itself never clamps.
pub fn reported_score(score: f64, clamp: bool) -> f64 {
    if clamp {
        score.clamp(0.0, 1.0)
    } else {
        score
    }
}

fn fact_json(fact: &AtomicFact) -> serde_json::Value {
    json!({
        "id": fact.id().to_string(),
        "text": fact.text(),
        "self_contained": fact.is_self_contained(),
    })
}
