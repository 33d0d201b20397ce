//! Run command implementation.

use super::{anthropic_provider, apply_model_args, ollama_provider};
use crate::cli::RunArgs;
use crate::config::{Config, ProviderKind};
use crate::error::Result;
use crate::io::{CsvSink, CsvSource};
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use adnorm_llm::MockProvider;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    apply_model_args(config, &args.model);
    if let Some(input) = args.input {
        config.source.path = Some(input);
    }
    if let Some(output) = args.output {
        config.destination.path = Some(output);
    }

    // Everything required is checked before the source is touched
    let extractor_config = config.extractor_config()?;
    let source = CsvSource::new(config.input_path()?);
    let sink = CsvSink::new(config.output_path()?);
    let pipeline = Pipeline::new(extractor_config).with_name(config.pipeline.name.clone());

    let report = match config.model.provider {
        ProviderKind::Anthropic => {
            let llm = anthropic_provider(config)?;
            pipeline.run(&source, llm, &sink).await?
        }
        ProviderKind::Ollama => pipeline.run(&source, ollama_provider(config), &sink).await?,
        ProviderKind::Mock => pipeline.run(&source, MockProvider::default(), &sink).await?,
    };

    println!("{}", formatter.format_pipeline_report(&report)?);

    Ok(())
}
