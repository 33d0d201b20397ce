//! adnorm - standardize ad campaign names with an LLM.

use adnorm_cli::commands;
use adnorm_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> adnorm_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // File, then environment; command flags are applied per command
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();

    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &mut config, &formatter).await?;
        }
        Command::Classify(args) => {
            commands::execute_classify(args, &mut config, &formatter).await?;
        }
        Command::Report(args) => {
            commands::execute_report(args, &config, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for tables and JSON.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
