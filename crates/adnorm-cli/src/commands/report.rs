//! Report command implementation.

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::io::CsvSource;
use crate::output::Formatter;
use crate::report::{aggregate, names_for};
use adnorm_domain::traits::RecordSource;

/// Execute the report command.
pub async fn execute_report(args: ReportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = match args.input {
        Some(path) => path,
        None => config.output_path()?.to_path_buf(),
    };

    let dataset = CsvSource::new(input).read()?;

    if let Some(value) = args.names {
        let names = names_for(&dataset, args.by, &value)?;
        println!("{}", formatter.format_names(args.by, &value, &names)?);
        return Ok(());
    }

    let rows = aggregate(&dataset, args.by)?;
    println!("{}", formatter.format_report(args.by, &rows)?);

    Ok(())
}
