//! Error types for relay operations.

use sheet_store::StoreError;
use telegram_client::TelegramError;
use thiserror::Error;
use zalo_client::ZaloError;

/// Errors that can occur while relaying bookings.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Booking store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Telegram call failed.
    #[error("telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Zalo call failed.
    #[error("zalo error: {0}")]
    Zalo(#[from] ZaloError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Task queue is at capacity.
    #[error("task queue is full")]
    QueueFull,

    /// Task queue worker has stopped.
    #[error("task queue is closed")]
    QueueClosed,
}
