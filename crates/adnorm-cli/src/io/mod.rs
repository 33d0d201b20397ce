//! Extract and Load adapters.

pub mod csv;

pub use self::csv::{CsvSink, CsvSource};
