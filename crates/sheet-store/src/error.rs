//! Store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the booking sheet.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request to the spreadsheet API failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The spreadsheet API answered with a non-success status.
    #[error("Sheets API error {status}: {body}")]
    Api { status: u16, body: String },

    /// A row or cell address outside the sheet.
    #[error("row {row} out of range")]
    RowOutOfRange { row: usize },

    /// Missing or invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
