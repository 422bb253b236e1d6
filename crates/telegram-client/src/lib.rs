//! Telegram Bot API client.
//!
//! Covers the handful of methods the admin chat needs:
//!
//! - Sending HTML messages with inline or reply keyboards
//! - Editing a sent message in place
//! - Acknowledging inline button presses
//! - Registering the bot command menu
//!
//! # Example
//!
//! ```no_run
//! use telegram_client::{SendMessageParams, TelegramClient, TelegramConfig};
//!
//! # async fn example() -> Result<(), telegram_client::TelegramError> {
//! let client = TelegramClient::new(TelegramConfig::from_env()?)?;
//! let sent = client
//!     .send_message(&SendMessageParams::html(123456789, "<b>Xin chào</b>"))
//!     .await?;
//! println!("Sent message {}", sent.message_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use config::TelegramConfig;
pub use error::TelegramError;
pub use types::*;
