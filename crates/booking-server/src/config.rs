//! Configuration loaded from environment variables.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use relay::queue::DEFAULT_QUEUE_CAPACITY;
use sheet_store::{SheetsConfig, ShopClock, StoreError};
use telegram_client::{TelegramConfig, TelegramError};
use zalo_client::{ZaloConfig, ZaloError};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UTC_OFFSET: i32 = 7;

/// Booking server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Telegram chat receiving booking alerts and accepting commands.
    pub admin_chat_id: i64,
    /// Shop-local offset from UTC, in hours.
    pub utc_offset_hours: i32,
    /// Maximum number of webhook tasks waiting for the worker.
    pub queue_capacity: usize,
    pub sheets: SheetsConfig,
    pub telegram: TelegramConfig,
    pub zalo: ZaloConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PORT` | Listen port (all interfaces) | `5000` |
    /// | `TELEGRAM_CHAT_ID` | Admin chat ID | (required) |
    /// | `SHOP_UTC_OFFSET` | Shop-local UTC offset in hours | `7` |
    /// | `QUEUE_CAPACITY` | Webhook task queue size | `256` |
    ///
    /// Sheets, Telegram and Zalo settings are read by their own config
    /// types (`SHEET_ID`, `TELEGRAM_TOKEN`, `ZALO_BOT_TOKEN`, ...).
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = parse_var("PORT", DEFAULT_PORT)?;
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let admin_chat_id = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| ConfigError::MissingChatId)?
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("TELEGRAM_CHAT_ID"))?;

        let utc_offset_hours = parse_var("SHOP_UTC_OFFSET", DEFAULT_UTC_OFFSET)?;
        if ShopClock::from_hours(utc_offset_hours).is_none() {
            return Err(ConfigError::Invalid("SHOP_UTC_OFFSET"));
        }
        let queue_capacity = parse_var("QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?;

        Ok(Self {
            addr,
            admin_chat_id,
            utc_offset_hours,
            queue_capacity,
            sheets: SheetsConfig::from_env()?,
            telegram: TelegramConfig::from_env()?,
            zalo: ZaloConfig::from_env()?,
        })
    }

    /// Clock for the configured offset.
    pub fn clock(&self) -> ShopClock {
        ShopClock::from_hours(self.utc_offset_hours).unwrap_or_default()
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(name))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELEGRAM_CHAT_ID environment variable is required")]
    MissingChatId,

    #[error("Invalid value for {0}")]
    Invalid(&'static str),

    #[error("Sheets configuration: {0}")]
    Sheets(#[from] StoreError),

    #[error("Telegram configuration: {0}")]
    Telegram(#[from] TelegramError),

    #[error("Zalo configuration: {0}")]
    Zalo(#[from] ZaloError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert_eq!(parse_value::<i32>("SHOP_UTC_OFFSET", "-5").unwrap(), -5);
        let err = parse_value::<u16>("PORT", "http").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");
    }
}
