//! Result types for extraction and reconciliation

use adnorm_domain::{EnrichedRecord, ParsedFields};
use serde::Serialize;

/// How one batch was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum BatchStatus {
    /// The model's answer parsed cleanly
    Parsed,
    /// The answer was unusable; every input name got a null record
    Fallback {
        /// Why parsing failed
        reason: String,
    },
}

/// Output of a single batch
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Zero-based batch index within the run
    pub index: usize,

    /// Parsed (or fallback) records, in model order
    pub fields: Vec<ParsedFields>,

    /// Parse outcome
    pub status: BatchStatus,
}

impl BatchOutput {
    /// True when this batch took the null-record path
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, BatchStatus::Fallback { .. })
    }
}

/// Result of extracting fields for a whole dataset
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// All batches' records concatenated in batch order
    pub fields: Vec<ParsedFields>,

    /// Run statistics
    pub metadata: ExtractionMetadata,
}

/// Statistics about one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionMetadata {
    /// Model used
    pub model_name: String,

    /// Batches sent
    pub batches: usize,

    /// Batches whose answer could not be parsed
    pub fallback_batches: usize,

    /// Records taken from parsed answers
    pub records_parsed: usize,

    /// Null records substituted for failed batches
    pub records_fallback: usize,

    /// Wall-clock time spent extracting
    pub processing_time_ms: u64,
}

/// Result of joining parsed fields back onto the dataset
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Original column order of the left side
    pub columns: Vec<String>,

    /// One enriched record per input row, input order
    pub records: Vec<EnrichedRecord>,

    /// Join statistics
    pub report: ReconcileReport,
}

/// Join statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Output rows (always equal to input rows)
    pub rows: usize,

    /// Rows that found a parsed record
    pub matched: usize,

    /// Rows left with null fields
    pub unmatched: usize,

    /// Parsed records ignored because their name was already seen
    pub duplicate_keys: usize,
}
