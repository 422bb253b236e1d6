//! Spreadsheet-backed booking store.
//!
//! Bookings live in a single sheet: one header row followed by one row per
//! booking. This crate provides:
//!
//! - The booking models and column layout
//! - A [`SheetBackend`] trait with Google Sheets and in-memory implementations
//! - [`SheetStore`], which implements ID assignment, status transitions,
//!   queries, statistics and the daily clear
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sheet_store::{GoogleSheets, NewBooking, SheetStore, SheetsConfig, ShopClock, StoreConfig};
//!
//! # async fn example() -> Result<(), sheet_store::StoreError> {
//! let backend = GoogleSheets::new(SheetsConfig::from_env()?)?;
//! let store = SheetStore::new(Arc::new(backend), ShopClock::default(), StoreConfig::default());
//!
//! let added = store
//!     .add_booking(&NewBooking {
//!         fullname: "Nguyễn Văn A".to_string(),
//!         phone: "0901234567".to_string(),
//!         service: "Combo VIP - 350K".to_string(),
//!         date: "2026-02-20".to_string(),
//!         time: "14:00".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Stored {} for {}", added.id, added.date);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod clock;
pub mod error;
pub mod google;
pub mod models;
pub mod store;

pub use backend::{MemorySheet, SheetBackend};
pub use clock::{display_date, to_display_date, ShopClock};
pub use error::{Result, StoreError};
pub use google::{GoogleSheets, SheetsConfig};
pub use models::*;
pub use store::{SheetStore, StoreConfig};
