//! Daily rollover: summary report followed by clearing the sheet.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::dispatch::Relay;

/// When and how often to check for the rollover window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverSchedule {
    /// Wall-clock poll period.
    pub poll_interval: Duration,
    /// Minutes after shop-local midnight during which the rollover may run.
    pub window_minutes: u32,
}

impl Default for RolloverSchedule {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            window_minutes: 10,
        }
    }
}

impl RolloverSchedule {
    /// Whether the rollover is due at `now` (shop-local).
    ///
    /// True inside the window after midnight unless it already ran today.
    pub fn should_run(&self, now: DateTime<FixedOffset>, last_run: Option<NaiveDate>) -> bool {
        let in_window = now.hour() == 0 && now.minute() < self.window_minutes;
        in_window && last_run != Some(now.date_naive())
    }
}

/// What a rollover did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    /// Whether the summary reached the admin chat.
    pub summary_sent: bool,
    /// Rows removed; `None` if clearing failed.
    pub cleared: Option<usize>,
}

/// Run the summary-and-clear sequence now.
///
/// The two steps are independent: a failed summary does not prevent the
/// clear.
pub async fn run_rollover(relay: &Relay) -> RolloverReport {
    let summary_sent = match relay.notifier().send_daily_summary().await {
        Ok(()) => true,
        Err(e) => {
            error!("Daily summary failed: {}", e);
            false
        }
    };
    let cleared = match relay.store().clear_old_data().await {
        Ok(count) => Some(count),
        Err(e) => {
            error!("Clearing bookings failed: {}", e);
            None
        }
    };
    info!(summary_sent, ?cleared, "Daily rollover finished");
    RolloverReport {
        summary_sent,
        cleared,
    }
}

/// Poll the clock and run the rollover once per day.
///
/// `last_run` is shared so callers can observe the marker.
pub fn spawn_rollover_loop(
    relay: Arc<Relay>,
    schedule: RolloverSchedule,
    last_run: Arc<Mutex<Option<NaiveDate>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(
            Instant::now() + schedule.poll_interval,
            schedule.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(poll_interval = ?schedule.poll_interval, "Rollover loop started");

        loop {
            ticker.tick().await;

            let now = relay.store().clock().now();
            let mut marker = last_run.lock().await;
            if !schedule.should_run(now, *marker) {
                debug!(time = %now.format("%H:%M"), "Rollover not due");
                continue;
            }
            *marker = Some(now.date_naive());
            drop(marker);

            info!(date = %now.date_naive(), "Daily rollover starting");
            run_rollover(&relay).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 2, day, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_should_run_inside_window_once() {
        let schedule = RolloverSchedule::default();
        assert!(schedule.should_run(at(20, 0, 0), None));
        assert!(schedule.should_run(at(20, 0, 9), None));
        assert!(schedule.should_run(
            at(20, 0, 3),
            NaiveDate::from_ymd_opt(2026, 2, 19)
        ));

        let today = NaiveDate::from_ymd_opt(2026, 2, 20);
        assert!(!schedule.should_run(at(20, 0, 5), today));
    }

    #[test]
    fn test_should_not_run_outside_window() {
        let schedule = RolloverSchedule::default();
        assert!(!schedule.should_run(at(20, 0, 10), None));
        assert!(!schedule.should_run(at(20, 23, 59), None));
        assert!(!schedule.should_run(at(20, 12, 0), None));
    }
}
