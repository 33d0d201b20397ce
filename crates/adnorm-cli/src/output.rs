//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use crate::pipeline::PipelineReport;
use crate::report::{GroupBy, ReportRow};
use adnorm_domain::ParsedFields;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

const NULL: &str = "-";

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format standardized campaign names.
    pub fn format_fields(&self, fields: &[ParsedFields]) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
            CliFormat::Table => Ok(self.format_fields_table(fields)),
        }
    }

    fn format_fields_table(&self, fields: &[ParsedFields]) -> String {
        if fields.is_empty() {
            return self.colorize("No campaigns.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Campaign", "Source", "Objective", "Geo", "Audience"]);

        for f in fields {
            let [source, objective, geo, audience] = f.values().map(|v| v.unwrap_or(NULL));
            builder.push_record([f.campaign_name.as_str(), source, objective, geo, audience]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format an aggregated report.
    pub fn format_report(&self, by: GroupBy, rows: &[ReportRow]) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            CliFormat::Table => Ok(self.format_report_table(by, rows)),
        }
    }

    fn format_report_table(&self, by: GroupBy, rows: &[ReportRow]) -> String {
        if rows.is_empty() {
            return self.colorize("No rows to report.", "yellow");
        }

        let mut builder = Builder::default();
        let mut header = by.column().to_string();
        if let Some(first) = header.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        builder.push_record([header.as_str(), "Campaigns", "Spend", "Revenue", "ROAS"]);

        for row in rows {
            let roas = row
                .roas
                .map(|r| format!("{:.2}x", r))
                .unwrap_or_else(|| NULL.to_string());
            builder.push_record([
                row.key.as_deref().unwrap_or(NULL).to_string(),
                row.campaigns.to_string(),
                format!("${:.0}", row.spend),
                format!("${:.0}", row.revenue),
                roas,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        table.to_string()
    }

    /// Format the raw names grouped under one value.
    pub fn format_names(&self, by: GroupBy, value: &str, names: &[String]) -> Result<String> {
        if self.format == CliFormat::Json {
            return Ok(serde_json::to_string_pretty(names)?);
        }
        if names.is_empty() {
            return Ok(self.warning(&format!("No campaigns with {} '{}'", by.column(), value)));
        }

        let mut lines = vec![format!(
            "{} campaign name(s) with {} '{}':",
            names.len(),
            by.column(),
            value
        )];
        lines.extend(names.iter().map(|name| format!("  {}", name)));
        Ok(lines.join("\n"))
    }

    /// Format the summary of a pipeline run.
    pub fn format_pipeline_report(&self, report: &PipelineReport) -> Result<String> {
        if self.format == CliFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let mut lines = vec![self.success(&format!(
            "Loaded {} rows to {}",
            report.load.rows_loaded, report.load.destination
        ))];
        lines.push(format!(
            "  rows: {} extracted, {} prepared",
            report.rows_extracted, report.rows_prepared
        ));
        lines.push(format!(
            "  batches: {} ({} fell back to nulls) using {}",
            report.extraction.batches,
            report.extraction.fallback_batches,
            report.extraction.model_name
        ));
        lines.push(format!(
            "  matched: {}, unmatched: {}, duplicate keys: {}",
            report.reconcile.matched, report.reconcile.unmatched, report.reconcile.duplicate_keys
        ));
        lines.push(format!("  job: {}", report.load.job_id));

        if report.extraction.fallback_batches > 0 {
            lines.push(self.warning(&format!(
                "{} campaign(s) have null fields because their batch could not be parsed",
                report.extraction.records_fallback
            )));
        }

        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
