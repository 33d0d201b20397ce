//! Core Extractor implementation

use crate::chunking::Chunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{BatchOutput, BatchStatus, ExtractionMetadata, ExtractionOutcome};
use adnorm_domain::traits::{CompletionRequest, LlmProvider, Transient};
use adnorm_domain::ParsedFields;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Sends campaign names to the model in batches and collects parsed fields
///
/// Batches run strictly one after another. A batch whose answer cannot be
/// parsed yields one null record per input name instead of an error, so the
/// output always covers the input exactly once.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm: L,
    config: ExtractorConfig,
    chunker: Chunker,
    prompt: PromptBuilder,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display + Transient,
{
    /// Create an Extractor; fails if the configuration is invalid
    pub fn new(llm: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;

        let chunker = Chunker::new(config.batch_size)?;
        let prompt = match &config.prompt_template {
            Some(template) => PromptBuilder::with_template(template.clone()),
            None => PromptBuilder::new(),
        };

        Ok(Self {
            llm,
            config,
            chunker,
            prompt,
        })
    }

    /// Extract fields for every name, in order
    ///
    /// Returns an error only when the model transport fails for good; parse
    /// failures are absorbed per batch.
    pub async fn extract(&self, names: &[String]) -> Result<ExtractionOutcome, ExtractorError> {
        let start_time = Instant::now();
        let batches = self.chunker.chunk(names);

        if batches.len() == 1 {
            info!("Sending {} campaigns to {}", names.len(), self.config.model);
        } else {
            info!(
                "Sending {} campaigns in {} batches to {}",
                names.len(),
                batches.len(),
                self.config.model
            );
        }

        let mut metadata = ExtractionMetadata {
            model_name: self.config.model.clone(),
            batches: batches.len(),
            ..Default::default()
        };
        let mut fields = Vec::with_capacity(names.len());

        for (index, batch) in batches.iter().enumerate() {
            info!(
                batch = index + 1,
                total = batches.len(),
                campaigns = batch.len(),
                "Processing batch"
            );

            let output = self.extract_batch(index, batch).await?;
            if output.is_fallback() {
                metadata.fallback_batches += 1;
                metadata.records_fallback += output.fields.len();
            } else {
                metadata.records_parsed += output.fields.len();
            }
            fields.extend(output.fields);
        }

        metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} parsed, {} fallback ({} of {} batches failed to parse)",
            metadata.records_parsed,
            metadata.records_fallback,
            metadata.fallback_batches,
            metadata.batches
        );

        Ok(ExtractionOutcome { fields, metadata })
    }

    /// Run one batch: one prompt, one model call (plus transport retries), one parse
    pub async fn extract_batch(
        &self,
        index: usize,
        names: &[String],
    ) -> Result<BatchOutput, ExtractorError> {
        let prompt = self.prompt.build(names);
        debug!("Batch {} prompt length: {} chars", index + 1, prompt.len());

        let response = self.call_llm(index, prompt).await?;
        debug!("Batch {} response length: {} chars", index + 1, response.len());

        match parse_response(&response, self.config.strict_schema) {
            Ok(fields) => {
                if fields.len() != names.len() {
                    debug!(
                        "Batch {} returned {} records for {} names",
                        index + 1,
                        fields.len(),
                        names.len()
                    );
                }
                Ok(BatchOutput {
                    index,
                    fields,
                    status: BatchStatus::Parsed,
                })
            }
            Err(e) => {
                error!("Failed to parse batch {}: {}", index + 1, e);
                Ok(BatchOutput {
                    index,
                    fields: names.iter().map(ParsedFields::fallback).collect(),
                    status: BatchStatus::Fallback {
                        reason: e.to_string(),
                    },
                })
            }
        }
    }

    /// Call the model, retrying transient transport failures with backoff
    async fn call_llm(&self, index: usize, prompt: String) -> Result<String, ExtractorError> {
        let request = CompletionRequest {
            prompt,
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
        };

        let mut attempt = 0;
        loop {
            match self.llm.complete(&request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_delay(attempt);
                    attempt += 1;
                    warn!(
                        "Batch {} attempt {}/{} failed: {}; retrying in {:?}",
                        index + 1,
                        attempt,
                        self.config.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(ExtractorError::Llm(e.to_string())),
            }
        }
    }
}
