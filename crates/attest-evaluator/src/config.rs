//! Classifier configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the FactClassifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum time for a single judge call (seconds)
    pub judge_timeout_secs: u64,

    /// Extra judge calls after a contract violation before giving up
    pub contract_retries: u32,

    /// Optional system prompt sent with every classification request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            judge_timeout_secs: 60,
            contract_retries: 0,
            system_prompt: None,
        }
    }
}

impl ClassifierConfig {
    /// Re-ask the judge up to twice on out-of-contract answers
    pub fn lenient() -> Self {
        Self {
            judge_timeout_secs: 180,
            contract_retries: 2,
            system_prompt: None,
        }
    }

    /// Get the judge timeout as a Duration
    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.judge_timeout_secs == 0 {
            return Err("judge_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.contract_retries, 0);
        assert!(config.validate().is_ok());
        assert!(ClassifierConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClassifierConfig {
            judge_timeout_secs: 0,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
