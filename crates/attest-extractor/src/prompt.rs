//! Prompt construction for fact extraction

use attest_domain::FewShotExample;

/// Builds prompts for the claim generator
pub struct PromptBuilder<'a> {
    response: &'a str,
    context: Option<&'a str>,
    examples: Vec<FewShotExample>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a response
    pub fn new(response: &'a str) -> Self {
        Self {
            response,
            context: None,
            examples: Vec::new(),
        }
    }

    /// Add the context the response was written for
    pub fn with_context(mut self, context: Option<&'a str>) -> Self {
        self.context = context;
        self
    }

    /// Add worked examples shown before the response
    pub fn with_examples(mut self, examples: Vec<FewShotExample>) -> Self {
        self.examples = examples;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if !self.examples.is_empty() {
            prompt.push_str("Here are some examples:\n\n");
            for (idx, example) in self.examples.iter().enumerate() {
                prompt.push_str(&format!("Example {}:\nText: {}\nFacts:\n", idx + 1, example.text));
                for fact in &example.facts {
                    prompt.push_str(&format!("- {}\n", fact));
                }
                prompt.push('\n');
            }
        }

        if let Some(context) = self.context {
            prompt.push_str(&format!("Context: {}\n\n", context));
        }

        prompt.push_str(&format!("Text: {}\n\n", self.response));
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "Extract the atomic facts from the following text. \
An atomic fact is a simple, self-contained statement that makes a single factual claim.";

const OUTPUT_FORMAT_REMINDER: &str = "Output each atomic fact on a new line.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_and_instructions() {
        let prompt = PromptBuilder::new("Alice works at Acme Corp").build();

        assert!(prompt.contains("Text: Alice works at Acme Corp"));
        assert!(prompt.starts_with("Extract the atomic facts"));
        assert!(prompt.ends_with("Output each atomic fact on a new line."));
        assert!(!prompt.contains("Context:"));
        assert!(!prompt.contains("Example 1"));
    }

    #[test]
    fn test_prompt_includes_context() {
        let prompt = PromptBuilder::new("It was written in 1851.")
            .with_context(Some("Information about Moby Dick"))
            .build();

        assert!(prompt.contains("Context: Information about Moby Dick"));
    }

    #[test]
    fn test_prompt_includes_examples_in_order() {
        let prompt = PromptBuilder::new("Test")
            .with_examples(vec![
                FewShotExample::new("Paris is big.", ["Paris is big."]),
                FewShotExample::new("Rome is old.", ["Rome is old."]),
            ])
            .build();

        let first = prompt.find("Example 1:\nText: Paris is big.").unwrap();
        let second = prompt.find("Example 2:\nText: Rome is old.").unwrap();
        assert!(first < second);
        assert!(prompt.contains("- Rome is old.\n"));
        // Examples come before the text under analysis
        assert!(second < prompt.find("Text: Test").unwrap());
    }
}
