//! Receipt returned by the Load collaborator

use serde::{Deserialize, Serialize};

/// Result descriptor returned by the Load collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReceipt {
    /// Number of rows persisted
    pub rows_loaded: usize,

    /// Where the rows went (file path, table id, ...)
    pub destination: String,

    /// UUIDv7 string; sorts by creation time, so it lines up with log output
    pub job_id: String,
}

impl LoadReceipt {
    /// Build a receipt with a freshly generated job id
    pub fn new(rows_loaded: usize, destination: impl Into<String>) -> Self {
        Self {
            rows_loaded,
            destination: destination.into(),
            job_id: uuid::Uuid::now_v7().to_string(),
        }
    }
}
