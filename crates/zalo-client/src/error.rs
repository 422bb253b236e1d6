//! Error types for zalo-client.

use thiserror::Error;

/// Errors that can occur when calling the Zalo Bot API.
#[derive(Debug, Error)]
pub enum ZaloError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API rejected the call.
    #[error("Zalo API error {code}: {description}")]
    Api { code: i32, description: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
