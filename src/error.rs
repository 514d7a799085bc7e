//! Error types for the dashboard library.

use thiserror::Error;

use crate::data::config::ThresholdField;

/// Errors surfaced to the user by dashboard operations.
///
/// Malformed input lines are never reported here: the parsers drop them.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A threshold holds a non-numeric value; saving is refused.
    #[error("Row {row}: {field} is not a valid number")]
    InvalidThreshold { row: usize, field: ThresholdField },

    /// Nothing has been loaded yet.
    #[error("No data to export")]
    NoData,

    /// A sensor or sample kind given by name or ordinal is not known.
    #[error("Unknown sensor or sample kind: {0}")]
    UnknownKind(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the export payload failed.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
