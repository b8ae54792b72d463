//! Built-in few-shot example provider
//!
//! Picks a subject domain from keywords in the response and context, then
//! returns worked examples for that domain.

use attest_domain::{ExampleProvider, FewShotExample};
use std::fmt;

const SCIENCE_KEYWORDS: [&str; 4] = ["science", "physics", "chemistry", "biology"];
const HISTORY_KEYWORDS: [&str; 4] = ["history", "war", "century", "ancient"];

/// Subject area used to pick examples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Natural sciences
    Science,
    /// History
    History,
    /// Anything else
    General,
}

impl Domain {
    /// Detect the domain of `text` by keyword (substring, case-insensitive)
    ///
    /// Science wins over history when both match.
    pub fn detect(text: &str) -> Self {
        let text = text.to_lowercase();
        if SCIENCE_KEYWORDS.iter().any(|word| text.contains(word)) {
            Domain::Science
        } else if HISTORY_KEYWORDS.iter().any(|word| text.contains(word)) {
            Domain::History
        } else {
            Domain::General
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Science => "science",
            Domain::History => "history",
            Domain::General => "general",
        };
        write!(f, "{}", name)
    }
}

/// Keyword-driven example provider with built-in examples per domain
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainExampleProvider;

impl DomainExampleProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }

    /// Examples for an explicit domain
    pub fn examples_for(&self, domain: Domain) -> Vec<FewShotExample> {
        match domain {
            Domain::Science => vec![
                FewShotExample::new(
                    "The Human Genome Project was completed in 2003, mapping approximately 92% of the human genome. \
                     It cost around $3 billion and involved scientists from 20 institutions across 6 countries.",
                    [
                        "The Human Genome Project was completed in 2003.",
                        "The Human Genome Project mapped approximately 92% of the human genome.",
                        "The Human Genome Project cost around $3 billion.",
                        "The Human Genome Project involved scientists from 20 institutions.",
                        "The Human Genome Project involved scientists from 6 countries.",
                    ],
                ),
                FewShotExample::new(
                    "Water boils at 100°C at sea level, but at higher altitudes it boils at lower temperatures.",
                    [
                        "Water boils at 100°C at sea level.",
                        "At higher altitudes, water boils at lower temperatures.",
                    ],
                ),
            ],
            Domain::History => vec![
                FewShotExample::new(
                    "World War II ended in 1945 with the surrender of Japan after the United States dropped atomic \
                     bombs on Hiroshima and Nagasaki. The war lasted six years and involved more than 30 countries.",
                    [
                        "World War II ended in 1945.",
                        "Japan surrendered at the end of World War II.",
                        "The United States dropped atomic bombs on Hiroshima and Nagasaki.",
                        "World War II lasted six years.",
                        "World War II involved more than 30 countries.",
                    ],
                ),
                FewShotExample::new(
                    "The Roman Empire reached its greatest territorial extent under Emperor Trajan in 117 CE, \
                     covering 5 million square kilometers.",
                    [
                        "The Roman Empire reached its greatest territorial extent under Emperor Trajan.",
                        "The Roman Empire's maximum extent occurred in 117 CE.",
                        "At its height, the Roman Empire covered 5 million square kilometers.",
                    ],
                ),
            ],
            Domain::General => vec![FewShotExample::new(
                "Paris is the capital of France and has a population of 2.1 million people. The Eiffel Tower, \
                 completed in 1889, stands at 330 meters tall.",
                [
                    "Paris is the capital of France.",
                    "Paris has a population of 2.1 million people.",
                    "The Eiffel Tower was completed in 1889.",
                    "The Eiffel Tower is 330 meters tall.",
                ],
            )],
        }
    }
}

impl ExampleProvider for DomainExampleProvider {
    fn provide_examples(&self, response: &str, context: Option<&str>) -> Vec<FewShotExample> {
        let text = format!("{} {}", response, context.unwrap_or_default());
        self.examples_for(Domain::detect(&text))
    }
}
