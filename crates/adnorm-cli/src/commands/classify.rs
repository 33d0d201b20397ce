//! Classify command implementation.

use super::{anthropic_provider, apply_model_args, ollama_provider};
use crate::cli::ClassifyArgs;
use crate::config::{Config, ProviderKind};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use adnorm_domain::traits::{LlmProvider, Transient};
use adnorm_domain::ParsedFields;
use adnorm_extractor::{Extractor, ExtractorConfig};
use adnorm_llm::MockProvider;
use std::fmt::Display;

/// Execute the classify command.
pub async fn execute_classify(
    args: ClassifyArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    apply_model_args(config, &args.model);

    let names: Vec<String> = args
        .names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err(CliError::InvalidInput(
            "campaign names must not be blank".to_string(),
        ));
    }

    let extractor_config = config.extractor_config()?;
    let fields = match config.model.provider {
        ProviderKind::Anthropic => {
            let llm = anthropic_provider(config)?;
            classify(llm, extractor_config, &names).await?
        }
        ProviderKind::Ollama => classify(ollama_provider(config), extractor_config, &names).await?,
        ProviderKind::Mock => classify(MockProvider::default(), extractor_config, &names).await?,
    };

    println!("{}", formatter.format_fields(&fields)?);

    Ok(())
}

/// Standardize `names` without touching any dataset.
pub async fn classify<L>(
    llm: L,
    config: ExtractorConfig,
    names: &[String],
) -> Result<Vec<ParsedFields>>
where
    L: LlmProvider,
    L::Error: Display + Transient,
{
    let extractor = Extractor::new(llm, config)?;
    let outcome = extractor.extract(names).await?;
    Ok(outcome.fields)
}
