//! Configuration file parsing for the pipeline.
//!
//! Settings come from an `adnorm.toml` file, then `ADNORM_*` environment
//! variables, then command-line flags, each layer overriding the last.

use adnorm_extractor::{DuplicatePolicy, ExtractorConfig, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "adnorm.toml";

/// Environment variable overriding `source.path`
pub const ENV_INPUT: &str = "ADNORM_INPUT";
/// Environment variable overriding `destination.path`
pub const ENV_OUTPUT: &str = "ADNORM_OUTPUT";
/// Environment variable overriding `model.name`
pub const ENV_MODEL: &str = "ADNORM_MODEL";

/// Pipeline configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to render TOML
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Pipeline configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Run identification
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Where the raw campaign rows come from
    #[serde(default)]
    pub source: SourceSection,

    /// Where the standardized rows go
    #[serde(default)]
    pub destination: DestinationSection,

    /// Model transport settings
    #[serde(default)]
    pub model: ModelSection,

    /// Batching, retry and join settings
    #[serde(default)]
    pub extractor: ExtractorSection,
}

/// `[pipeline]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Pipeline name, used in log output
    #[serde(default = "default_pipeline_name")]
    pub name: String,

    /// Pipeline version
    #[serde(default = "default_pipeline_version")]
    pub version: String,
}

/// `[source]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSection {
    /// Input CSV file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[destination]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationSection {
    /// Output CSV file, replaced on every run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Which model transport to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    #[default]
    Anthropic,
    /// Local Ollama server
    Ollama,
    /// Canned empty answers; every row ends up unmatched
    Mock,
}

/// `[model]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Transport
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model identifier
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Output token bound per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Custom prompt; must contain `{campaigns}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Override the transport's default endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// `[extractor]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorSection {
    /// Campaign names per model call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Extra attempts per batch on transient transport failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry delay in milliseconds
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Duplicate campaign names on the parsed side
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Require all five keys in every response element
    #[serde(default = "default_true")]
    pub strict_schema: bool,
}

fn default_pipeline_name() -> String {
    "adnorm".to_string()
}

fn default_pipeline_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_model_name() -> String {
    ExtractorConfig::default().model
}

fn default_max_tokens() -> u32 {
    ExtractorConfig::default().max_tokens
}

fn default_batch_size() -> usize {
    ExtractorConfig::default().batch_size
}

fn default_max_retries() -> u32 {
    ExtractorConfig::default().max_retries
}

fn default_retry_base_delay_ms() -> u64 {
    ExtractorConfig::default().retry_base_delay_ms
}

fn default_true() -> bool {
    true
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            name: default_pipeline_name(),
            version: default_pipeline_version(),
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            name: default_model_name(),
            max_tokens: default_max_tokens(),
            prompt: None,
            endpoint: None,
        }
    }
}

impl Default for ExtractorSection {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            duplicate_policy: DuplicatePolicy::default(),
            strict_schema: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `path` if given, else `adnorm.toml` if present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Starter configuration written by `adnorm config init`
    pub fn example() -> Self {
        let mut config = Self::default();
        config.source.path = Some(PathBuf::from("data/campaigns.csv"));
        config.destination.path = Some(PathBuf::from("data/campaigns_standardized.csv"));
        config.model.prompt = Some(DEFAULT_TEMPLATE.to_string());
        config
    }

    /// Apply `ADNORM_INPUT`, `ADNORM_OUTPUT` and `ADNORM_MODEL` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply environment-style overrides from an arbitrary lookup
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(input) = get(ENV_INPUT) {
            self.source.path = Some(PathBuf::from(input));
        }
        if let Some(output) = get(ENV_OUTPUT) {
            self.destination.path = Some(PathBuf::from(output));
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model.name = model;
        }
    }

    /// Input file; a configuration error when unset
    pub fn input_path(&self) -> Result<&Path, ConfigError> {
        self.source
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("source.path".to_string()))
    }

    /// Output file; a configuration error when unset
    pub fn output_path(&self) -> Result<&Path, ConfigError> {
        self.destination
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("destination.path".to_string()))
    }

    /// Build and validate the extractor configuration
    pub fn extractor_config(&self) -> Result<ExtractorConfig, ConfigError> {
        let config = ExtractorConfig {
            batch_size: self.extractor.batch_size,
            max_tokens: self.model.max_tokens,
            model: self.model.name.clone(),
            prompt_template: self.model.prompt.clone(),
            max_retries: self.extractor.max_retries,
            retry_base_delay_ms: self.extractor.retry_base_delay_ms,
            duplicate_policy: self.extractor.duplicate_policy,
            strict_schema: self.extractor.strict_schema,
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
