//! CSV-backed Extract and Load adapters.

use crate::error::{CliError, Result};
use adnorm_domain::traits::{RecordSink, RecordSource};
use adnorm_domain::{CampaignRecord, Dataset, EnrichedRecord, LoadReceipt};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads a headered CSV file into a [`Dataset`]
///
/// Every cell is kept as a string; typing is left to whoever reads the
/// output.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvSource {
    type Error = CliError;

    fn read(&self) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        // Cells are keyed by header name; a repeated name would drop one
        Dataset::check_columns(&columns)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let cells = result?;
            let map: Map<String, Value> = columns
                .iter()
                .zip(cells.iter())
                .map(|(column, cell)| (column.clone(), Value::String(cell.to_string())))
                .collect();
            records.push(CampaignRecord::from_columns(row, map)?);
        }

        let dataset = Dataset::new(columns, records)?;
        info!("Extracted {} campaigns from {}", dataset.len(), self.describe());
        Ok(dataset)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes enriched rows to a CSV file, replacing its previous contents
///
/// Rows go to a temporary file next to the destination first, which is then
/// renamed over it, so an interrupted write never leaves a half-written file
/// at the destination.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "adnorm".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn write_to(&self, path: &Path, columns: &[String], rows: &[EnrichedRecord]) -> Result<()> {
        let output_columns = EnrichedRecord::output_columns(columns);

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)?;

        // Header is written even with zero rows
        writer.write_record(&output_columns)?;

        for record in rows {
            let row = record.to_row();
            writer.write_record(output_columns.iter().map(|c| cell(row.get(c))))?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for CsvSink {
    type Error = CliError;

    fn write(&self, columns: &[String], rows: &[EnrichedRecord]) -> Result<LoadReceipt> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        debug!("Writing {} rows to {}", rows.len(), temp.display());

        if let Err(e) = self.write_to(&temp, columns, rows) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        fs::rename(&temp, &self.path)?;

        let receipt = LoadReceipt::new(rows.len(), self.path.display().to_string());
        info!(
            "Loaded {} rows to {} (job {})",
            receipt.rows_loaded, receipt.destination, receipt.job_id
        );
        Ok(receipt)
    }
}

/// Render a JSON cell as CSV text; null becomes an empty cell
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adnorm_domain::{DataError, ParsedFields};
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_keeps_columns_and_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "in.csv",
            "date,campaign_name,spend,revenue\n2024-01-01,fb_prospecting_us,100.50,320\n2024-01-01,gg_brand_uk,80,95.25\n",
        );

        let dataset = CsvSource::new(&path).read().unwrap();
        assert_eq!(dataset.columns(), ["date", "campaign_name", "spend", "revenue"]);
        assert_eq!(dataset.names(), vec!["fb_prospecting_us", "gg_brand_uk"]);
        assert_eq!(
            dataset.records()[0].get("spend"),
            Some(&Value::String("100.50".into()))
        );
    }

    #[test]
    fn test_read_without_campaign_name_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.csv", "name,spend\nfb,1\n");

        let result = CsvSource::new(&path).read();
        assert!(matches!(result, Err(CliError::Data(_))));
    }

    #[test]
    fn test_read_rejects_repeated_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.csv", "campaign_name,spend,spend\nfb_us,1,2\n");

        match CsvSource::new(&path).read() {
            Err(CliError::Data(DataError::DuplicateColumn(column))) => assert_eq!(column, "spend"),
            other => panic!("expected DuplicateColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_read_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "in.csv", "campaign_name,spend\n");

        let dataset = CsvSource::new(&path).read().unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns(), ["campaign_name", "spend"]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = CsvSource::new("/nonexistent/in.csv").read();
        assert!(matches!(result, Err(CliError::Csv(_))));
    }

    #[test]
    fn test_write_appends_target_columns() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("silver").join("out.csv");

        let a = CampaignRecord::from_pairs(
            0,
            [
                ("campaign_name", Value::String("fb_us".into())),
                ("spend", Value::String("10".into())),
            ],
        )
        .unwrap();
        let b = CampaignRecord::from_pairs(
            1,
            [
                ("campaign_name", Value::String("mystery, inc".into())),
                ("spend", Value::String("5".into())),
            ],
        )
        .unwrap();
        let parsed = ParsedFields {
            source: Some("facebook".into()),
            geo: Some("US".into()),
            ..ParsedFields::fallback("fb_us")
        };
        let rows = vec![EnrichedRecord::new(a, Some(&parsed)), EnrichedRecord::new(b, None)];
        let columns = vec!["campaign_name".to_string(), "spend".to_string()];

        let receipt = CsvSink::new(&out).write(&columns, &rows).unwrap();
        assert_eq!(receipt.rows_loaded, 2);
        assert_eq!(receipt.destination, out.display().to_string());

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            "campaign_name,spend,source,objective,geo,audience\n\
             fb_us,10,facebook,,US,\n\
             \"mystery, inc\",5,,,,\n"
        );
        assert!(!CsvSink::new(&out).temp_path().exists());
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let out = write_file(&dir, "out.csv", "old,stuff\n1,2\n3,4\n5,6\n");
        let columns = vec!["campaign_name".to_string()];

        let receipt = CsvSink::new(&out).write(&columns, &[]).unwrap();
        assert_eq!(receipt.rows_loaded, 0);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "campaign_name,source,objective,geo,audience\n"
        );
    }

    #[test]
    fn test_round_trip_through_source() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.csv");
        let record =
            CampaignRecord::from_pairs(0, [("campaign_name", Value::String("tt_de".into()))])
                .unwrap();
        let rows = vec![EnrichedRecord::new(record, Some(&ParsedFields::fallback("tt_de")))];

        CsvSink::new(&out)
            .write(&["campaign_name".to_string()], &rows)
            .unwrap();
        let dataset = CsvSource::new(&out).read().unwrap();
        assert_eq!(dataset.names(), vec!["tt_de"]);
        assert_eq!(dataset.records()[0].get("source"), Some(&Value::String(String::new())));
    }
}
