//! Website booking submission.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use relay::BookingForm;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Successful booking response.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub message: &'static str,
    pub booking_id: String,
}

/// Accept a booking from the website form.
///
/// The body may be JSON or `application/x-www-form-urlencoded`. Storing
/// happens inline so the response can carry the booking ID.
pub async fn submit_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BookingResponse>> {
    let form = parse_form(&headers, &body)?;
    if form.is_empty() {
        return Err(ServerError::EmptyPayload);
    }
    let booking = form.into_booking()?;
    info!(service = %booking.service, date = %booking.date, "Website booking received");

    let added = state
        .relay
        .submit_booking(&booking)
        .await
        .map_err(ServerError::Storage)?;

    Ok(Json(BookingResponse {
        success: true,
        message: "Đặt lịch thành công!",
        booking_id: added.id,
    }))
}

/// Decode the body according to its declared content type.
///
/// Bodies declared as JSON must be valid JSON. Bodies with no or another
/// content type are tried as JSON first and then as form data.
fn parse_form(headers: &HeaderMap, body: &[u8]) -> Result<BookingForm> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::EmptyPayload);
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        return serde_urlencoded::from_bytes(body)
            .map_err(|e| ServerError::InvalidPayload(e.to_string()));
    }
    let json = serde_json::from_slice(body);
    if is_json(content_type) {
        return json.map_err(|e| ServerError::InvalidPayload(e.to_string()));
    }
    match json {
        Ok(form) => Ok(form),
        Err(json_err) => serde_urlencoded::from_bytes(body)
            .map_err(|_| ServerError::InvalidPayload(json_err.to_string())),
    }
}

/// `application/json` and `+json` media types.
fn is_json(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}
