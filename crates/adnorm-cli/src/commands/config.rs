//! Config command implementation.

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;

/// Execute the config command.
pub async fn execute_config(args: ConfigArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    match args.command {
        ConfigCommand::Init { output, force } => {
            let rendered = Config::example().to_toml()?;
            match output {
                Some(path) => {
                    if path.exists() && !force {
                        return Err(CliError::InvalidInput(format!(
                            "{} already exists (use --force to overwrite)",
                            path.display()
                        )));
                    }
                    fs::write(&path, rendered)?;
                    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
                }
                None => print!("{}", rendered),
            }
        }
        ConfigCommand::Show => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
