//! Command implementations.

pub mod classify;
pub mod config;
pub mod report;
pub mod run;

pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::report::execute_report;
pub use self::run::execute_run;

use crate::cli::ModelArgs;
use crate::config::Config;
use crate::error::Result;
use adnorm_llm::{AnthropicProvider, OllamaProvider};

/// Fold `--provider`, `--model` and `--batch-size` into the configuration.
pub fn apply_model_args(config: &mut Config, args: &ModelArgs) {
    if let Some(provider) = args.provider {
        config.model.provider = provider.into();
    }
    if let Some(model) = &args.model {
        config.model.name = model.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.extractor.batch_size = batch_size;
    }
}

/// Anthropic transport; the API key comes from the environment.
pub fn anthropic_provider(config: &Config) -> Result<AnthropicProvider> {
    let provider = AnthropicProvider::from_env()?;
    Ok(match &config.model.endpoint {
        Some(endpoint) => provider.with_endpoint(endpoint.clone()),
        None => provider,
    })
}

/// Ollama transport at the configured (or default local) endpoint.
pub fn ollama_provider(config: &Config) -> OllamaProvider {
    match &config.model.endpoint {
        Some(endpoint) => OllamaProvider::new(endpoint.clone()),
        None => OllamaProvider::default_endpoint(),
    }
}
