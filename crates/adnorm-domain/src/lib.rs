//! adnorm Domain Layer
//!
//! Core data model and boundary traits for campaign name standardization.
//! Every other crate in the workspace depends on the types defined here.
//!
//! ## Key Concepts
//!
//! - **CampaignRecord**: one row of the working dataset, keyed by `campaign_name`
//! - **ParsedFields**: the structured fields the model extracted for one name
//! - **EnrichedRecord**: a record with its parsed fields merged in
//! - **LoadReceipt**: what the Load collaborator reports back after persisting
//!
//! ## Architecture
//!
//! Infrastructure (model transports, tabular readers and writers) lives in
//! other crates and plugs in through the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fields;
pub mod receipt;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use fields::{EnrichedRecord, ParsedFields, TARGET_FIELDS};
pub use receipt::LoadReceipt;
pub use record::{CampaignRecord, DataError, Dataset, CAMPAIGN_NAME};
