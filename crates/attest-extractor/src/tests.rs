//! Integration tests for the FactExtractor

#[cfg(test)]
mod tests {
    use crate::{DomainExampleProvider, ExtractorConfig, ExtractorError, FactExtractor};
    use async_trait::async_trait;
    use attest_domain::{CapabilityError, ClaimGenerator, FewShotExample};
    use attest_llm::MockProvider;
    use std::sync::Arc;
    use std::time::Duration;

    const RESPONSE: &str = "The Eiffel Tower is in Paris. It was completed in 1889.";

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let llm = MockProvider::new("1. The Eiffel Tower is in Paris.\n2. The Eiffel Tower was completed in 1889.\n");
        let extractor = FactExtractor::basic().with_generator(Arc::new(llm.clone()));

        let facts = extractor.extract(RESPONSE, None).await.unwrap();

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].text(), "The Eiffel Tower is in Paris.");
        assert_eq!(facts[1].text(), "The Eiffel Tower was completed in 1889.");
        assert!(facts.iter().all(|f| f.source_text() == RESPONSE));
        assert!(facts.iter().all(|f| f.is_self_contained().is_none()));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_response_and_context() {
        let llm = MockProvider::new("- fact");
        let extractor = FactExtractor::basic().with_generator(Arc::new(llm.clone()));

        extractor.extract(RESPONSE, Some("Landmarks of France")).await.unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains(RESPONSE));
        assert!(prompt.contains("Context: Landmarks of France"));
        assert!(!prompt.contains("Example 1"));
    }

    #[tokio::test]
    async fn test_examples_from_provider_are_used() {
        let llm = MockProvider::new("- fact");
        let extractor = FactExtractor::basic()
            .with_generator(Arc::new(llm.clone()))
            .with_example_provider(Arc::new(DomainExampleProvider::new()));

        extractor
            .extract("Quantum physics describes small things.", None)
            .await
            .unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Example 1:\nText: The Human Genome Project"));
        assert!(prompt.contains("Example 2:"));
    }

    #[tokio::test]
    async fn test_closure_provider_and_example_limit() {
        let llm = MockProvider::new("- fact");
        let provider = |_response: &str, _context: Option<&str>| {
            (0..10)
                .map(|i| FewShotExample::new(format!("Example text {}", i), ["a fact"]))
                .collect::<Vec<_>>()
        };
        let mut config = ExtractorConfig::default();
        config.max_examples = 3;

        let extractor = FactExtractor::new(config)
            .with_generator(Arc::new(llm.clone()))
            .with_example_provider(Arc::new(provider));

        extractor.extract(RESPONSE, None).await.unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Example text 2"));
        assert!(!prompt.contains("Example text 3"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let mut llm = MockProvider::default();
        llm.add_error_rule("Extract the atomic facts");
        let extractor = FactExtractor::basic().with_generator(Arc::new(llm.clone()));

        let result = extractor.extract(RESPONSE, None).await;

        assert!(matches!(result, Err(ExtractorError::Generator(CapabilityError::Other(_)))));
        // No internal retry
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_generator_output() {
        let llm = MockProvider::new("\n\n  \n");
        let extractor = FactExtractor::basic().with_generator(Arc::new(llm));

        let facts = extractor.extract(RESPONSE, None).await.unwrap();
        assert!(facts.is_empty());
    }

    struct SlowGenerator;

    #[async_trait]
    impl ClaimGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, CapabilityError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        }
    }

    #[tokio::test]
    async fn test_generator_timeout() {
        let mut config = ExtractorConfig::default();
        config.extraction_timeout_secs = 1;
        let extractor = FactExtractor::new(config).with_generator(Arc::new(SlowGenerator));

        let result = extractor.extract(RESPONSE, None).await;
        assert_eq!(result, Err(ExtractorError::Timeout));
    }
}
