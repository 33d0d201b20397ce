//! Adnorm Extractor
//!
//! Turns free-form ad campaign names into structured fields using an LLM, and
//! joins the result back onto the campaign dataset.
//!
//! # Architecture
//!
//! ```text
//! names → Chunker → PromptBuilder → LLM → parse_response → reconcile → enriched rows
//! ```
//!
//! # Key Features
//!
//! - **Batching**: Fixed-size batches keep each response within the token bound
//! - **Fenced Output Tolerance**: Markdown code fences around the JSON are stripped
//! - **Null Fallback**: An unparseable batch degrades to null fields, not a failed run
//! - **Transport Retries**: Transient model errors are retried with exponential backoff
//! - **Row-Preserving Join**: Reconciliation never drops or duplicates input rows
//!
//! # Example Usage
//!
//! ```no_run
//! use adnorm_extractor::{reconcile, DuplicatePolicy, Extractor, ExtractorConfig};
//! use adnorm_domain::{CampaignRecord, Dataset};
//! use adnorm_llm::MockProvider;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"[{"campaign_name": "fb_prospecting_us",
//!     "source": "facebook", "objective": "prospecting", "geo": "US", "audience": "cold"}]"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let record = CampaignRecord::from_pairs(0, [("campaign_name", json!("fb_prospecting_us"))])?;
//! let dataset = Dataset::from_records(vec![record])?;
//!
//! let outcome = extractor.extract(&dataset.names()).await?;
//! let joined = reconcile(dataset, &outcome.fields, DuplicatePolicy::FirstMatchWins)?;
//!
//! println!("Matched: {} of {}", joined.report.matched, joined.report.rows);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod chunking;
mod parser;
mod extractor;
mod reconcile;

#[cfg(test)]
mod tests;

pub use error::ExtractorError;
pub use config::{DuplicatePolicy, ExtractorConfig};
pub use types::{
    BatchOutput, BatchStatus, ExtractionMetadata, ExtractionOutcome, ReconcileReport, Reconciled,
};
pub use prompt::{PromptBuilder, CAMPAIGNS_PLACEHOLDER, DEFAULT_TEMPLATE};
pub use chunking::Chunker;
pub use parser::{parse_response, strip_code_fence};
pub use extractor::Extractor;
pub use reconcile::{reconcile, ReconcileError};
