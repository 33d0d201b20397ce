//! Campaign records and the ordered dataset that carries them between stages

use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Name of the join-key column every dataset must carry
pub const CAMPAIGN_NAME: &str = "campaign_name";

/// Errors raised when a row or dataset violates the data model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Row has no `campaign_name` column
    #[error("Row {0} is missing the 'campaign_name' column")]
    MissingCampaignName(usize),

    /// `campaign_name` is present but not a string
    #[error("Row {0}: 'campaign_name' must be a string")]
    InvalidCampaignName(usize),

    /// Dataset header does not contain `campaign_name`
    #[error("Dataset has no 'campaign_name' column")]
    MissingColumn,

    /// Header names the same column twice
    #[error("Column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
}

/// One row of the working dataset
///
/// Columns are kept in their original order. Only `campaign_name` is
/// interpreted; every other column is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    columns: Map<String, Value>,
}

impl CampaignRecord {
    /// Build a record from an ordered column map
    ///
    /// `row` is the zero-based row index, used only for error reporting.
    pub fn from_columns(row: usize, columns: Map<String, Value>) -> Result<Self, DataError> {
        match columns.get(CAMPAIGN_NAME) {
            None => Err(DataError::MissingCampaignName(row)),
            Some(Value::String(_)) => Ok(Self { columns }),
            Some(_) => Err(DataError::InvalidCampaignName(row)),
        }
    }

    /// Convenience constructor from `(column, value)` pairs
    pub fn from_pairs<I, K>(row: usize, pairs: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let columns = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::from_columns(row, columns)
    }

    /// The campaign name (join key)
    pub fn campaign_name(&self) -> &str {
        self.columns
            .get(CAMPAIGN_NAME)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Replace the campaign name, keeping its column position
    pub fn set_campaign_name(&mut self, name: impl Into<String>) {
        if let Some(slot) = self.columns.get_mut(CAMPAIGN_NAME) {
            *slot = Value::String(name.into());
        }
    }

    /// Look up any column by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// All columns in original order
    pub fn columns(&self) -> &Map<String, Value> {
        &self.columns
    }
}

/// An ordered set of campaign records with a stable column list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<CampaignRecord>,
}

impl Dataset {
    /// Create a dataset; the column list must contain `campaign_name`
    pub fn new(columns: Vec<String>, records: Vec<CampaignRecord>) -> Result<Self, DataError> {
        Self::check_columns(&columns)?;
        Ok(Self { columns, records })
    }

    /// Check a header: `campaign_name` present, no name repeated
    pub fn check_columns(columns: &[String]) -> Result<(), DataError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in columns {
            if !seen.insert(column.as_str()) {
                return Err(DataError::DuplicateColumn(column.clone()));
            }
        }
        if !seen.contains(CAMPAIGN_NAME) {
            return Err(DataError::MissingColumn);
        }
        Ok(())
    }

    /// Build a dataset whose column list is taken from the first record
    pub fn from_records(records: Vec<CampaignRecord>) -> Result<Self, DataError> {
        let columns = match records.first() {
            Some(first) => first.columns().keys().cloned().collect(),
            None => vec![CAMPAIGN_NAME.to_string()],
        };
        Self::new(columns, records)
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in order
    pub fn records(&self) -> &[CampaignRecord] {
        &self.records
    }

    /// Consume the dataset, yielding its parts
    pub fn into_parts(self) -> (Vec<String>, Vec<CampaignRecord>) {
        (self.columns, self.records)
    }

    /// Campaign names in row order
    pub fn names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.campaign_name().to_string())
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
