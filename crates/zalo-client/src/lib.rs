//! Zalo Bot API client.
//!
//! Provides the webhook payload types, secret verification, and
//! `sendMessage` for plain-text replies to customers.
//!
//! # Example
//!
//! ```no_run
//! use zalo_client::{ZaloClient, ZaloConfig};
//!
//! # async fn example() -> Result<(), zalo_client::ZaloError> {
//! let client = ZaloClient::new(ZaloConfig::from_env()?)?;
//! client.send_message("chat-id", "Xin chào!").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::ZaloClient;
pub use config::ZaloConfig;
pub use error::ZaloError;
pub use types::{ZaloChat, ZaloEvent, ZaloMessage, ZaloSender, ZaloUpdate, TEXT_RECEIVED};
