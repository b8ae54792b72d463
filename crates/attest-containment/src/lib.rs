//! Attest Containment
//!
//! Self-containment check and repair for extracted facts, plus a standalone
//! relevance checker.
//!
//! A fact is self-contained when it can be understood without the response
//! it came from ("Melville wrote it" is not; "Herman Melville wrote Moby
//! Dick" is). The [`ContainmentResolver`] marks facts with `check` and
//! rewrites the ones that fail with `resolve`.
//!
//! # Examples
//!
//! ```
//! use attest_containment::ContainmentResolver;
//! use attest_domain::AtomicFact;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let response = "Paris is the capital of France.";
//! let resolver = ContainmentResolver::basic();
//! let facts = vec![AtomicFact::new("Paris is the capital", response)];
//!
//! let checked = resolver.check(&facts, response).await.unwrap();
//! assert_eq!(checked[0].is_self_contained(), Some(true));
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod prompt;
mod relevance;
mod resolver;

pub use config::ContainmentConfig;
pub use error::ContainmentError;
pub use prompt::parse_yes_no;
pub use relevance::RelevanceChecker;
pub use resolver::ContainmentResolver;
