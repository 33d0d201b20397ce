//! Spend/revenue aggregation over a standardized dataset.

use crate::error::{CliError, Result};
use adnorm_domain::Dataset;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Column holding the spend metric
pub const SPEND: &str = "spend";
/// Column holding the revenue metric
pub const REVENUE: &str = "revenue";

/// Column to group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Ad platform
    Source,
    /// Campaign goal; rows without one are left out
    Objective,
    /// Geography
    Geo,
}

impl GroupBy {
    /// Name of the grouped column
    pub fn column(&self) -> &'static str {
        match self {
            GroupBy::Source => "source",
            GroupBy::Objective => "objective",
            GroupBy::Geo => "geo",
        }
    }
}

/// One aggregated group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Group value; `None` collects rows where the field is null
    pub key: Option<String>,
    /// Rows in the group
    pub campaigns: usize,
    /// Total spend
    pub spend: f64,
    /// Total revenue
    pub revenue: f64,
    /// revenue / spend, two decimals; `None` when spend is zero
    pub roas: Option<f64>,
}

/// Group `dataset` by `by`, summing spend and revenue
///
/// Source groups are ordered by spend, the others by ROAS, both descending.
/// Empty metric cells count as zero; anything else unparseable is an error.
pub fn aggregate(dataset: &Dataset, by: GroupBy) -> Result<Vec<ReportRow>> {
    for column in [by.column(), SPEND, REVENUE] {
        if !dataset.columns().iter().any(|c| c == column) {
            return Err(CliError::InvalidInput(format!(
                "dataset has no '{}' column",
                column
            )));
        }
    }

    let mut groups: Vec<ReportRow> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();

    for (row, record) in dataset.records().iter().enumerate() {
        let key = text(record.get(by.column()));
        if by == GroupBy::Objective && key.is_none() {
            continue;
        }

        let spend = number(record.get(SPEND), row, SPEND)?;
        let revenue = number(record.get(REVENUE), row, REVENUE)?;

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(ReportRow {
                key,
                campaigns: 0,
                spend: 0.0,
                revenue: 0.0,
                roas: None,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.campaigns += 1;
        group.spend += spend;
        group.revenue += revenue;
    }

    for group in &mut groups {
        group.roas = roas(group.revenue, group.spend);
    }

    match by {
        GroupBy::Source => groups.sort_by(|a, b| b.spend.total_cmp(&a.spend)),
        GroupBy::Objective | GroupBy::Geo => groups.sort_by(|a, b| {
            let a = a.roas.unwrap_or(f64::NEG_INFINITY);
            let b = b.roas.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        }),
    }

    Ok(groups)
}

/// Raw campaign names whose `by` column equals `value`, in row order
///
/// Shows how many spellings one platform (or objective, or geo) had before
/// standardization. Matching ignores case.
pub fn names_for(dataset: &Dataset, by: GroupBy, value: &str) -> Result<Vec<String>> {
    if !dataset.columns().iter().any(|c| c == by.column()) {
        return Err(CliError::InvalidInput(format!(
            "dataset has no '{}' column",
            by.column()
        )));
    }

    let value = value.trim();
    Ok(dataset
        .records()
        .iter()
        .filter(|record| {
            text(record.get(by.column())).is_some_and(|v| v.eq_ignore_ascii_case(value))
        })
        .map(|record| record.campaign_name().to_string())
        .collect())
}

/// revenue / spend rounded to two decimals
pub fn roas(revenue: f64, spend: f64) -> Option<f64> {
    if spend == 0.0 {
        return None;
    }
    Some((revenue / spend * 100.0).round() / 100.0)
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>, row: usize, column: &str) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => Ok(n.as_f64().unwrap_or_default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().map_err(|_| {
            CliError::InvalidInput(format!("row {}: {} '{}' is not a number", row + 1, column, s))
        }),
        Some(other) => Err(CliError::InvalidInput(format!(
            "row {}: {} '{}' is not a number",
            row + 1,
            column,
            other
        ))),
    }
}
