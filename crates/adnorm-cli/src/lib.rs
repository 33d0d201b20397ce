//! adnorm CLI library.
//!
//! This library provides the pipeline around the extraction core: configuration
//! loading, the Transform stage, CSV Extract/Load adapters, the Pipeline
//! Orchestrator, spend/revenue reporting, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod transform;

pub use cli::{Cli, Command};
pub use config::{Config, ConfigError};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pipeline::{Pipeline, PipelineReport};
