//! CLI command definitions and argument parsing.

use crate::config::ProviderKind;
use crate::report::GroupBy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// adnorm - Standardize ad campaign names into structured fields.
#[derive(Debug, Parser)]
#[command(name = "adnorm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ./adnorm.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Model transport options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    Ollama,
    /// Canned empty answers (dry run)
    Mock,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Anthropic => ProviderKind::Anthropic,
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Mock => ProviderKind::Mock,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: extract, standardize, load
    Run(RunArgs),

    /// Standardize campaign names given on the command line
    Classify(ClassifyArgs),

    /// Aggregate spend and revenue of a standardized file
    Report(ReportArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Model overrides shared by `run` and `classify`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ModelArgs {
    /// Model transport
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Campaign names per model call
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Input CSV file (overrides source.path and ADNORM_INPUT)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV file (overrides destination.path and ADNORM_OUTPUT)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Campaign names to standardize
    #[arg(required = true)]
    pub names: Vec<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Standardized CSV file (defaults to destination.path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Grouping column
    #[arg(long, value_enum, default_value = "source")]
    pub by: GroupBy,

    /// List the raw campaign names grouped under this value instead
    #[arg(long, value_name = "VALUE")]
    pub names: Option<String>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print a starter adnorm.toml
    Init {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration after file and environment overrides
    Show,
}
