//! Transform stage: clean campaign names before extraction.

use adnorm_domain::{DataError, Dataset};
use tracing::info;

/// Trim every campaign name and drop rows whose name ends up empty
///
/// Line breaks inside a name become single spaces, since the prompt lists
/// one name per line. Column order and all other cells are left as they are.
pub fn prepare(dataset: Dataset) -> Result<Dataset, DataError> {
    let (columns, records) = dataset.into_parts();
    let extracted = records.len();

    let records: Vec<_> = records
        .into_iter()
        .filter_map(|mut record| {
            let cleaned = single_line(record.campaign_name());
            if cleaned.is_empty() {
                return None;
            }
            record.set_campaign_name(cleaned);
            Some(record)
        })
        .collect();

    info!(
        "Prepared {} campaigns for processing ({} dropped)",
        records.len(),
        extracted - records.len()
    );

    Dataset::new(columns, records)
}

fn single_line(name: &str) -> String {
    name.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
