//! Error types for the dashboard engine.
//!
//! Per-record problems never abort a batch: they are reported as [`RecordError`]
//! values next to the records that did normalize. [`DashboardError`] is reserved
//! for failures of a whole operation (configuration, document shape, fetches).

use serde::{Deserialize, Serialize};

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Error type for whole-operation failures.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Configuration file could not be read, parsed or applied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input document is not a list of records.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The impression source failed to deliver a response.
    #[error("Source error: {0}")]
    Source(String),

    /// Journey query parameters were rejected.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::InvalidDocument(err.to_string())
    }
}

/// Why a single raw record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing timestamp field")]
    MissingTimestamp,

    #[error("unparseable timestamp '{0}'")]
    UnparseableTimestamp(String),

    #[error("missing date field")]
    MissingDate,

    #[error("unparseable date '{0}'")]
    UnparseableDate(String),
}

/// A record that was skipped during batch normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Position of the record in the input batch
    pub index: usize,
    pub reason: RecordError,
}

/// Validation failures for the journey query form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Key must be at least {min_len} characters.")]
    KeyTooShort { min_len: usize },

    #[error("Timespan must be a number between {min} and {max}.")]
    DaysOutOfRange { min: u32, max: u32 },
}
