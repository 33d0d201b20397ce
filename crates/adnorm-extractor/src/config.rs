//! Configuration for the Extractor

use crate::error::ExtractorError;
use crate::prompt::CAMPAIGNS_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What reconciliation does when the model returns the same campaign name twice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first parsed record for a name, ignore the rest
    #[default]
    FirstMatchWins,
    /// Fail reconciliation on any repeated campaign name
    Reject,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Campaign names per model call
    pub batch_size: usize,

    /// Upper bound on output tokens per call
    pub max_tokens: u32,

    /// Model identifier
    pub model: String,

    /// Custom prompt template; must contain `{campaigns}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    /// Extra attempts per batch on transient transport failures
    pub max_retries: u32,

    /// First retry delay; doubles on each further attempt
    pub retry_base_delay_ms: u64,

    /// Handling of duplicate campaign names on the parsed side
    pub duplicate_policy: DuplicatePolicy,

    /// Require all five keys in every response element
    pub strict_schema: bool,
}

impl ExtractorConfig {
    /// Delay before retry number `attempt` (zero-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.batch_size == 0 {
            return Err(ExtractorError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ExtractorError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ExtractorError::Config("model must not be empty".to_string()));
        }
        if let Some(template) = &self.prompt_template {
            if !template.contains(CAMPAIGNS_PLACEHOLDER) {
                return Err(ExtractorError::Config(format!(
                    "prompt_template must contain {}",
                    CAMPAIGNS_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            // Enough for ~250 structured results
            max_tokens: 8192,
            model: "claude-sonnet-4-20250514".to_string(),
            prompt_template: None,
            max_retries: 2,
            retry_base_delay_ms: 1000,
            duplicate_policy: DuplicatePolicy::FirstMatchWins,
            strict_schema: true,
        }
    }
}
