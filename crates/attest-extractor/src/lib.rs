//! Attest Fact Extractor
//!
//! Decomposes a free-text response into atomic facts.
//!
//! # Overview
//!
//! With a [`ClaimGenerator`](attest_domain::ClaimGenerator) configured, the
//! response (plus optional context and few-shot examples) is sent through an
//! extraction prompt and the generator's output is parsed one fact per line.
//! Without one, the response is split on periods.
//!
//! # Architecture
//!
//! ```text
//! Response → PromptBuilder → ClaimGenerator → parse_fact_lines → AtomicFacts
//!          ↘ extract_basic (no generator) ↗
//! ```
//!
//! # Example Usage
//!
//! ```
//! use attest_extractor::FactExtractor;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let extractor = FactExtractor::basic();
//! let facts = extractor.extract("First fact. Second fact.", None).await.unwrap();
//!
//! assert_eq!(facts.len(), 2);
//! assert_eq!(facts[0].text(), "First fact");
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod examples;
mod extractor;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use examples::{Domain, DomainExampleProvider};
pub use extractor::{extract_basic, FactExtractor};
pub use parser::parse_fact_lines;
pub use prompt::PromptBuilder;
