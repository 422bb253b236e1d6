//! Booking operations on top of a [`SheetBackend`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::backend::SheetBackend;
use crate::clock::{display_date, to_display_date, ShopClock};
use crate::error::Result;
use crate::models::{
    col, AddedBooking, Booking, BookingStatus, DailySummary, NewBooking, Stats, StatusCounts,
    HEADER,
};

/// Tunables for the booking store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix of generated booking IDs.
    pub id_prefix: String,
    /// Maximum rows returned by status queries.
    pub status_limit: usize,
    /// Maximum rows returned by keyword search.
    pub search_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_prefix: "DUC".to_string(),
            status_limit: 20,
            search_limit: 10,
        }
    }
}

/// Booking store backed by a spreadsheet.
///
/// Every operation re-reads the whole sheet, which stays small because it is
/// cleared at each daily rollover. Writes from this process are serialized so
/// that concurrent submissions cannot be assigned the same ID.
#[derive(Clone)]
pub struct SheetStore {
    backend: Arc<dyn SheetBackend>,
    clock: ShopClock,
    config: StoreConfig,
    write_lock: Arc<Mutex<()>>,
}

impl SheetStore {
    /// Create a store over the given backend.
    pub fn new(backend: Arc<dyn SheetBackend>, clock: ShopClock, config: StoreConfig) -> Self {
        Self {
            backend,
            clock,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The shop clock used for "today".
    pub fn clock(&self) -> ShopClock {
        self.clock
    }

    /// The store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Persist a new booking with status Pending.
    ///
    /// The ID is the prefix followed by one more than the highest sequence
    /// number among rows created today.
    pub async fn add_booking(&self, booking: &NewBooking) -> Result<AddedBooking> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.backend.read_all().await?;
        if rows.is_empty() {
            let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
            self.backend.write_row(1, header.clone()).await?;
            rows.push(header);
        }

        let id = self.next_booking_id(&rows, &self.clock.today_display());
        let date = to_display_date(&booking.date);
        let row = booking.to_row(&id, &date, &self.clock.timestamp());
        let row_number = rows.len() + 1;

        self.backend.write_row(row_number, row).await?;
        info!(
            booking_id = %id,
            row = row_number,
            backend = self.backend.name(),
            "Booking stored"
        );

        Ok(AddedBooking { id, date })
    }

    /// Move a booking to `new_status`.
    ///
    /// Only rows whose current status may transition to `new_status` are
    /// candidates; if older rows share the ID, the most recent candidate wins.
    /// Returns `None` (and writes nothing) when no candidate exists.
    pub async fn update_status(
        &self,
        id: &str,
        new_status: BookingStatus,
    ) -> Result<Option<Booking>> {
        let _guard = self.write_lock.lock().await;

        let rows = self.backend.read_all().await?;
        let target = rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| row.get(col::ID).is_some_and(|cell| cell == id))
            .filter(|(_, row)| {
                row.get(col::STATUS)
                    .and_then(|cell| BookingStatus::from_label(cell))
                    .is_some_and(|current| current.can_transition_to(new_status))
            })
            .last();

        let Some((index, row)) = target else {
            warn!(booking_id = %id, status = ?new_status, "No booking eligible for status update");
            return Ok(None);
        };

        let row_number = index + 1;
        self.backend
            .update_cell(row_number, col::STATUS + 1, new_status.label())
            .await?;
        info!(booking_id = %id, row = row_number, status = ?new_status, "Booking status updated");

        let mut booking = Booking::from_row(row);
        booking.status = Some(new_status);
        Ok(Some(booking))
    }

    /// Bookings for a display-format date, ordered by time.
    pub async fn get_bookings_by_date(&self, date: &str) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.date == date)
            .collect();
        bookings.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(bookings)
    }

    /// Most recent bookings with the given status.
    pub async fn get_bookings_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>> {
        let matches: Vec<Booking> = self
            .bookings()
            .await?
            .into_iter()
            .filter(|b| b.status == Some(status))
            .collect();
        Ok(most_recent(matches, self.config.status_limit))
    }

    /// Most recent bookings whose ID, name, phone, or email contains `keyword`.
    pub async fn find_booking(&self, keyword: &str) -> Result<Vec<Booking>> {
        let keyword = keyword.trim().to_lowercase();
        let matches: Vec<Booking> = self
            .bookings()
            .await?
            .into_iter()
            .filter(|b| {
                [&b.id, &b.name, &b.phone, &b.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&keyword))
            })
            .collect();
        Ok(most_recent(matches, self.config.search_limit))
    }

    /// Totals for the admin overview.
    pub async fn get_stats(&self) -> Result<Stats> {
        let bookings = self.bookings().await?;
        let today = self.clock.today_display();
        Ok(Stats {
            total: bookings.len(),
            today: bookings.iter().filter(|b| b.date == today).count(),
            counts: StatusCounts::tally(&bookings),
        })
    }

    /// Closing report, or `None` when the sheet holds no bookings.
    pub async fn get_daily_summary(&self) -> Result<Option<DailySummary>> {
        let customers = self.bookings().await?;
        if customers.is_empty() {
            return Ok(None);
        }
        Ok(Some(DailySummary {
            date: display_date(self.clock.today()),
            total: customers.len(),
            counts: StatusCounts::tally(&customers),
            customers,
        }))
    }

    /// Delete every row except the header; returns the number removed.
    pub async fn clear_old_data(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let rows = self.backend.read_all().await?;
        if rows.len() <= 1 {
            return Ok(0);
        }
        let cleared = rows.len() - 1;
        self.backend.delete_rows(2, rows.len()).await?;
        info!(cleared, "Booking sheet cleared");
        Ok(cleared)
    }

    /// All data rows as bookings.
    async fn bookings(&self) -> Result<Vec<Booking>> {
        let rows = self.backend.read_all().await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| Booking::from_row(row))
            .collect())
    }

    fn next_booking_id(&self, rows: &[Vec<String>], today: &str) -> String {
        let prefix = self.config.id_prefix.as_str();
        let max = rows
            .iter()
            .skip(1)
            .filter(|row| row.get(col::CREATED_AT).is_some_and(|c| c.contains(today)))
            .filter_map(|row| row.get(col::ID)?.strip_prefix(prefix)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{}{:02}", prefix, max + 1)
    }
}

/// Keep the last `limit` items.
fn most_recent(mut items: Vec<Booking>, limit: usize) -> Vec<Booking> {
    let excess = items.len().saturating_sub(limit);
    items.drain(..excess);
    items
}

impl std::fmt::Debug for SheetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetStore")
            .field("backend", &self.backend.name())
            .field("clock", &self.clock)
            .field("config", &self.config)
            .finish()
    }
}
