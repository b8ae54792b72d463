//! Containment resolver configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the containment resolver and relevance checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentConfig {
    /// Maximum time for a single judge call (seconds)
    pub judge_timeout_secs: u64,

    /// Maximum characters accepted from a rewrite
    pub max_rewrite_length: usize,
}

impl Default for ContainmentConfig {
    fn default() -> Self {
        Self {
            judge_timeout_secs: 60,
            max_rewrite_length: 1_000,
        }
    }
}

impl ContainmentConfig {
    /// Short timeout, tight rewrite bound
    pub fn aggressive() -> Self {
        Self {
            judge_timeout_secs: 20,
            max_rewrite_length: 500,
        }
    }

    /// Long timeout, loose rewrite bound
    pub fn lenient() -> Self {
        Self {
            judge_timeout_secs: 180,
            max_rewrite_length: 4_000,
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
        if self.max_rewrite_length == 0 {
            return Err("max_rewrite_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ContainmentConfig::default().validate().is_ok());
        assert!(ContainmentConfig::aggressive().validate().is_ok());
        assert!(ContainmentConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ContainmentConfig {
            judge_timeout_secs: 0,
            ..ContainmentConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
