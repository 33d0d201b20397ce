//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction core and the
//! infrastructure around it. Implementations live in other crates.

use crate::{Dataset, EnrichedRecord, LoadReceipt};
use std::future::Future;

/// One model invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Rendered prompt text
    pub prompt: String,

    /// Model identifier
    pub model: String,

    /// Upper bound on output tokens
    pub max_tokens: u32,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (adnorm-llm). The handle is
/// created once per run and passed to the extractor explicitly.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send one prompt, returning the raw text content of the answer
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Errors that know whether the failed operation is worth repeating
pub trait Transient {
    /// True when an identical retry could plausibly succeed
    fn is_transient(&self) -> bool;
}

/// Upstream collaborator: reads the raw (bronze) dataset
pub trait RecordSource {
    /// Error type for read operations
    type Error;

    /// Read every row, in order
    fn read(&self) -> Result<Dataset, Self::Error>;

    /// Human-readable location, for logging
    fn describe(&self) -> String;
}

/// Downstream collaborator: persists the enriched (silver) dataset
///
/// Implementations replace any prior contents of the destination.
pub trait RecordSink {
    /// Error type for write operations
    type Error;

    /// Persist `rows`; `columns` is the original dataset's column order
    fn write(
        &self,
        columns: &[String],
        rows: &[EnrichedRecord],
    ) -> Result<LoadReceipt, Self::Error>;
}
