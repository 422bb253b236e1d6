//! Route handlers for the booking server.

pub mod booking;
pub mod status;
pub mod webhooks;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Status
        .route("/", get(status::home))
        .route("/health", get(status::health))
        .route("/debug", get(status::debug))
        .route("/reset", get(status::reset))
        // Inbound bookings and webhooks
        .route("/booking", post(booking::submit_booking))
        .route("/telegram", post(webhooks::telegram))
        .route("/zalo", post(webhooks::zalo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
