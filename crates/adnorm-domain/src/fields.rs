//! Parsed per-campaign fields and the enriched output row

use crate::record::CampaignRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Columns the model fills in, in output order
pub const TARGET_FIELDS: [&str; 4] = ["source", "objective", "geo", "audience"];

/// Structured output for one campaign name
///
/// Produced by the batch extractor and consumed immediately by the
/// reconciler. `campaign_name` is the join key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Join key, as echoed back by the model
    pub campaign_name: String,

    /// Ad platform (facebook, google, tiktok, ...)
    pub source: Option<String>,

    /// Campaign goal (prospecting, retargeting, ...)
    pub objective: Option<String>,

    /// Two-letter geography code
    pub geo: Option<String>,

    /// Audience type (cold, warm, lookalike, ...)
    pub audience: Option<String>,
}

impl ParsedFields {
    /// Null-valued record for a name whose batch could not be parsed
    ///
    /// # Examples
    ///
    /// ```
    /// use adnorm_domain::ParsedFields;
    ///
    /// let fields = ParsedFields::fallback("fb_prospecting_us");
    /// assert_eq!(fields.campaign_name, "fb_prospecting_us");
    /// assert!(fields.is_empty());
    /// ```
    pub fn fallback(campaign_name: impl Into<String>) -> Self {
        Self {
            campaign_name: campaign_name.into(),
            ..Self::default()
        }
    }

    /// True when none of the four target fields is set
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.objective.is_none()
            && self.geo.is_none()
            && self.audience.is_none()
    }

    /// Target field values in [`TARGET_FIELDS`] order
    pub fn values(&self) -> [Option<&str>; 4] {
        [
            self.source.as_deref(),
            self.objective.as_deref(),
            self.geo.as_deref(),
            self.audience.as_deref(),
        ]
    }
}

/// A campaign record with the parsed fields merged in
///
/// The four target fields are `None` when reconciliation found no match.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Original row, untouched
    pub record: CampaignRecord,

    /// Ad platform
    pub source: Option<String>,

    /// Campaign goal
    pub objective: Option<String>,

    /// Two-letter geography code
    pub geo: Option<String>,

    /// Audience type
    pub audience: Option<String>,
}

impl EnrichedRecord {
    /// Merge parsed fields onto a record; `None` leaves all four fields null
    pub fn new(record: CampaignRecord, fields: Option<&ParsedFields>) -> Self {
        match fields {
            Some(f) => Self {
                record,
                source: f.source.clone(),
                objective: f.objective.clone(),
                geo: f.geo.clone(),
                audience: f.audience.clone(),
            },
            None => Self {
                record,
                source: None,
                objective: None,
                geo: None,
                audience: None,
            },
        }
    }

    /// The campaign name (join key)
    pub fn campaign_name(&self) -> &str {
        self.record.campaign_name()
    }

    /// True when any target field is non-null
    ///
    /// A row joined to an all-null record still has no fields.
    pub fn has_fields(&self) -> bool {
        self.source.is_some()
            || self.objective.is_some()
            || self.geo.is_some()
            || self.audience.is_some()
    }

    /// Target field values in [`TARGET_FIELDS`] order
    pub fn values(&self) -> [Option<&str>; 4] {
        [
            self.source.as_deref(),
            self.objective.as_deref(),
            self.geo.as_deref(),
            self.audience.as_deref(),
        ]
    }

    /// Output column list: original columns, then the target columns
    ///
    /// An original column sharing a name with a target column is dropped in
    /// favour of the parsed value.
    pub fn output_columns(original: &[String]) -> Vec<String> {
        original
            .iter()
            .filter(|c| !TARGET_FIELDS.contains(&c.as_str()))
            .cloned()
            .chain(TARGET_FIELDS.iter().map(|f| f.to_string()))
            .collect()
    }

    /// Flatten into an ordered row, JSON nulls for missing values
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row: Map<String, Value> = self
            .record
            .columns()
            .iter()
            .filter(|(k, _)| !TARGET_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (name, value) in TARGET_FIELDS.iter().zip(self.values()) {
            let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
            row.insert(name.to_string(), value);
        }
        row
    }
}
