//! Service status and maintenance endpoints.

use axum::extract::State;
use axum::Json;
use relay::QueueStats;
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "BarberShop Booking Bot";
const TIME_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

#[derive(Serialize)]
pub struct Home {
    pub service: &'static str,
    pub status: &'static str,
    pub endpoints: [&'static str; 6],
    pub shop_time: String,
}

/// Service overview.
pub async fn home(State(state): State<AppState>) -> Json<Home> {
    Json(Home {
        service: SERVICE_NAME,
        status: "running",
        endpoints: ["/booking", "/telegram", "/zalo", "/health", "/debug", "/reset"],
        shop_time: state.relay.store().clock().now().format(TIME_FORMAT).to_string(),
    })
}

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct DebugInfo {
    pub server: &'static str,
    pub utc_time: String,
    pub shop_time: String,
    pub utc_offset: String,
    pub active_sessions: usize,
    pub queue: QueueStats,
    pub queue_available: usize,
    /// Shop-local date of the last scheduled rollover, `yyyy-mm-dd`.
    pub last_rollover: Option<String>,
}

/// Runtime diagnostics.
pub async fn debug(State(state): State<AppState>) -> Json<DebugInfo> {
    let clock = state.relay.store().clock();
    let last_run = *state.last_rollover.lock().await;
    let last_rollover = last_run.map(|date| date.format("%Y-%m-%d").to_string());

    Json(DebugInfo {
        server: "running",
        utc_time: chrono::Utc::now().format(TIME_FORMAT).to_string(),
        shop_time: clock.now().format(TIME_FORMAT).to_string(),
        utc_offset: clock.offset().to_string(),
        active_sessions: state.relay.sessions().len().await,
        queue: state.queue.stats(),
        queue_available: state.queue.available(),
        last_rollover,
    })
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub summary_sent: bool,
    /// Booking rows removed; `None` if clearing failed.
    pub cleared: Option<usize>,
    pub shop_time: String,
}

/// Send the daily summary and clear the sheet now.
///
/// Does not touch the scheduled rollover marker.
pub async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    let report = state.relay.rollover().await;
    Json(ResetResponse {
        success: report.cleared.is_some(),
        summary_sent: report.summary_sent,
        cleared: report.cleared,
        shop_time: state.relay.store().clock().now().format(TIME_FORMAT).to_string(),
    })
}
