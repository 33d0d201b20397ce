//! Error types for the CLI application.

use crate::config::ConfigError;
use adnorm_domain::DataError;
use adnorm_extractor::{ExtractorError, ReconcileError};
use adnorm_llm::LlmError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dataset violates the data model
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Extraction aborted
    #[error("Extraction failed: {0}")]
    Extractor(#[from] ExtractorError),

    /// Reconciliation rejected the parsed records
    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Model provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
