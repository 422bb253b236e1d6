//! Application state shared across handlers.

use std::sync::Arc;

use chrono::NaiveDate;
use relay::{Relay, TaskQueue};
use tokio::sync::Mutex;
use zalo_client::ZaloConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    /// Background worker for webhook updates.
    pub queue: TaskQueue,
    /// Used to check the Zalo webhook secret.
    pub zalo: ZaloConfig,
    /// Shop-local date of the last scheduled rollover.
    pub last_rollover: Arc<Mutex<Option<NaiveDate>>>,
}

impl AppState {
    pub fn new(
        relay: Arc<Relay>,
        queue: TaskQueue,
        zalo: ZaloConfig,
        last_rollover: Arc<Mutex<Option<NaiveDate>>>,
    ) -> Self {
        Self {
            relay,
            queue,
            zalo,
            last_rollover,
        }
    }
}
