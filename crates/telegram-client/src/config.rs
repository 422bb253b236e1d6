//! Configuration types for telegram-client.

use std::env;

use crate::error::TelegramError;

/// Default Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot credentials and endpoint.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org").
    pub api_base: String,
    /// Bot token issued by BotFather.
    pub token: String,
}

impl TelegramConfig {
    /// Create a configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TELEGRAM_TOKEN` | Bot token | (required) |
    /// | `TELEGRAM_API_URL` | Bot API base URL | `https://api.telegram.org` |
    pub fn from_env() -> Result<Self, TelegramError> {
        let token = env::var("TELEGRAM_TOKEN")
            .map_err(|_| TelegramError::Config("TELEGRAM_TOKEN is required".to_string()))?;
        let mut config = Self::new(token);
        if let Ok(base) = env::var("TELEGRAM_API_URL") {
            config.api_base = base;
        }
        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}
