//! Error types for the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay::{MissingFields, RelayError};
use thiserror::Error;

/// Errors returned by the booking and webhook routes.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body carried no booking fields.
    #[error("Dữ liệu trống!")]
    EmptyPayload,

    /// Body was neither JSON nor form-encoded.
    #[error("Dữ liệu không hợp lệ: {0}")]
    InvalidPayload(String),

    #[error("{0}")]
    MissingFields(#[from] MissingFields),

    /// The booking could not be stored.
    #[error("Lỗi lưu dữ liệu!")]
    Storage(#[source] RelayError),

    /// Webhook secret header did not match.
    #[error("invalid token")]
    InvalidSecret,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::EmptyPayload
            | ServerError::InvalidPayload(_)
            | ServerError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ServerError::Storage(err) => {
                tracing::error!("Booking storage error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::InvalidSecret => {
                tracing::warn!("Rejected webhook with invalid secret");
                let body = serde_json::json!({ "error": self.to_string() });
                return (StatusCode::FORBIDDEN, Json(body)).into_response();
            }
        };

        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ServerError>;
