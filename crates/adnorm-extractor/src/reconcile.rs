//! Left join of parsed fields back onto the dataset

use crate::config::DuplicatePolicy;
use crate::types::{ReconcileReport, Reconciled};
use adnorm_domain::{Dataset, EnrichedRecord, ParsedFields};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while joining parsed fields onto the dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The model returned more than one record for the same name
    #[error("Duplicate parsed records for campaign name '{0}'")]
    DuplicateKey(String),
}

/// Join `parsed` onto `dataset` by campaign name
///
/// Every input row produces exactly one output row, in input order, whatever
/// the parsed side contains. Keys are compared after trimming surrounding
/// whitespace. Rows without a match keep null target fields; parsed records
/// naming no row are ignored.
pub fn reconcile(
    dataset: Dataset,
    parsed: &[ParsedFields],
    policy: DuplicatePolicy,
) -> Result<Reconciled, ReconcileError> {
    let mut report = ReconcileReport::default();
    let mut index: HashMap<&str, &ParsedFields> = HashMap::with_capacity(parsed.len());

    for fields in parsed {
        let key = fields.campaign_name.trim();
        match index.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(fields);
            }
            Entry::Occupied(existing) => {
                if policy == DuplicatePolicy::Reject {
                    return Err(ReconcileError::DuplicateKey(existing.key().to_string()));
                }
                report.duplicate_keys += 1;
                debug!("Duplicate parsed record for '{}'; keeping the first", key);
            }
        }
    }
    if report.duplicate_keys > 0 {
        warn!(
            "Ignored {} duplicate parsed record(s); first match wins",
            report.duplicate_keys
        );
    }

    let (columns, records) = dataset.into_parts();
    let records: Vec<EnrichedRecord> = records
        .into_iter()
        .map(|record| {
            let matched = index.get(record.campaign_name().trim()).copied();
            if matched.is_some() {
                report.matched += 1;
            } else {
                report.unmatched += 1;
            }
            EnrichedRecord::new(record, matched)
        })
        .collect();
    report.rows = records.len();

    debug!(
        "Reconciled {} rows: {} matched, {} unmatched, {} duplicate keys",
        report.rows, report.matched, report.unmatched, report.duplicate_keys
    );

    Ok(Reconciled {
        columns,
        records,
        report,
    })
}
