//! Pipeline orchestration: Extract → Transform → Standardize → Reconcile → Load.

use crate::error::{CliError, Result};
use crate::transform;
use adnorm_domain::traits::{LlmProvider, RecordSink, RecordSource, Transient};
use adnorm_domain::LoadReceipt;
use adnorm_extractor::{reconcile, ExtractionMetadata, Extractor, ExtractorConfig, ReconcileReport};
use serde::Serialize;
use std::fmt::Display;
use tracing::info;

/// Summary of one completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Rows read from the source
    pub rows_extracted: usize,

    /// Rows left after cleaning
    pub rows_prepared: usize,

    /// Batch statistics
    pub extraction: ExtractionMetadata,

    /// Join statistics
    pub reconcile: ReconcileReport,

    /// What the sink wrote
    pub load: LoadReceipt,
}

/// Runs the stages in order, one dataset value handed from each to the next
///
/// Nothing is written unless every stage before Load succeeds.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    config: ExtractorConfig,
}

impl Pipeline {
    /// Create a pipeline with the given extractor settings
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            name: "adnorm".to_string(),
            config,
        }
    }

    /// Name shown in log output
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run every stage against `source`, `provider` and `sink`
    pub async fn run<S, L, K>(&self, source: &S, provider: L, sink: &K) -> Result<PipelineReport>
    where
        S: RecordSource,
        CliError: From<S::Error>,
        L: LlmProvider,
        L::Error: Display + Transient,
        K: RecordSink,
        CliError: From<K::Error>,
    {
        info!("Starting pipeline '{}'...", self.name);

        // Invalid settings fail here, before any I/O
        let extractor = Extractor::new(provider, self.config.clone())?;

        let dataset = source.read()?;
        let rows_extracted = dataset.len();

        let prepared = transform::prepare(dataset)?;
        let rows_prepared = prepared.len();

        let outcome = extractor.extract(&prepared.names()).await?;
        let reconciled = reconcile(prepared, &outcome.fields, self.config.duplicate_policy)?;

        let load = sink.write(&reconciled.columns, &reconciled.records)?;

        info!(
            "Pipeline complete! Loaded {} rows to {}",
            load.rows_loaded, load.destination
        );

        Ok(PipelineReport {
            rows_extracted,
            rows_prepared,
            extraction: outcome.metadata,
            reconcile: reconciled.report,
            load,
        })
    }
}
