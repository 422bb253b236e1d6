//! Telegram and Zalo webhooks.
//!
//! Updates are handed to the task queue and acknowledged immediately.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use telegram_client::Update;
use tracing::{debug, warn};
use zalo_client::ZaloUpdate;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Header carrying the Zalo webhook secret.
pub const ZALO_SECRET_HEADER: &str = "X-ZaloOA-Secret";

fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Telegram admin bot updates. Always answered with `{ok: true}`.
pub async fn telegram(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Unreadable Telegram update: {}", e);
            return ok();
        }
    };
    debug!(update_id = update.update_id, "Telegram update received");

    let relay = state.relay.clone();
    let queued = state.queue.submit("telegram_update", async move {
        relay.handle_telegram_update(&update).await;
        Ok(())
    });
    if let Err(e) = queued {
        warn!("Telegram update dropped: {}", e);
    }
    ok()
}

/// Zalo customer chat updates.
///
/// Rejected with 403 unless the secret header matches; otherwise answered
/// with `{ok: true}`.
pub async fn zalo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let secret = headers
        .get(ZALO_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !state.zalo.verify_secret(secret) {
        return Err(ServerError::InvalidSecret);
    }

    let update: ZaloUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Unreadable Zalo update: {}", e);
            return Ok(ok());
        }
    };

    let relay = state.relay.clone();
    let queued = state.queue.submit("zalo_update", async move {
        relay.handle_zalo_update(&update).await;
        Ok(())
    });
    if let Err(e) = queued {
        warn!("Zalo update dropped: {}", e);
    }
    Ok(ok())
}
