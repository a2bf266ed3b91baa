//! Error types for ingestion, daycount and report operations.

use chrono::NaiveDate;
use std::path::PathBuf;

/// Result type for daycount operations
pub type DaycountResult<T> = Result<T, DaycountError>;

/// Error type for daycount operations
#[derive(Debug, thiserror::Error)]
pub enum DaycountError {
    #[error("Invalid date '{value}': expected {expected}")]
    InvalidDate { value: String, expected: &'static str },

    #[error("Invalid analysis window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Unknown aggregation mode: {0}")]
    UnknownMode(String),

    #[error("Unknown write mode: {0}. Must be 'a', 'w', or 'x'")]
    UnknownWriteMode(String),

    #[error("Order type '{0}' has no coarse category (expected prefix AT, AD or ID)")]
    UnmappedOrderType(String),

    #[error("Unknown unmapped-prefix policy: {0}. Must be 'error' or 'unknown'")]
    UnknownPolicy(String),

    #[error("No table #{index} in {source_name}")]
    MissingTable { index: usize, source_name: String },

    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Malformed row {row} in {source_name}: {message}")]
    MalformedRow {
        row: usize,
        source_name: String,
        message: String,
    },

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl DaycountError {
    /// Shorthand for a date that failed to parse in the given format.
    pub fn invalid_date(value: &str, expected: &'static str) -> Self {
        DaycountError::InvalidDate {
            value: value.to_string(),
            expected,
        }
    }
}
