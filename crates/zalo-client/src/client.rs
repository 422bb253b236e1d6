//! Zalo Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::ZaloConfig;
use crate::error::ZaloError;
use crate::types::{ApiResponse, SendMessageParams};

/// Timeout applied to every Bot API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Zalo Bot API.
#[derive(Clone)]
pub struct ZaloClient {
    http: Client,
    config: ZaloConfig,
}

impl ZaloClient {
    /// Create a client with the standard request timeout.
    pub fn new(config: ZaloConfig) -> Result<Self, ZaloError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ZaloError::Http)?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ZaloConfig {
        &self.config
    }

    /// Send a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ZaloError> {
        let url = self.config.method_url("sendMessage");
        debug!("Zalo sendMessage to {}", chat_id);

        let response = self
            .http
            .post(&url)
            .json(&SendMessageParams { chat_id, text })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            // Gateway errors come back as plain text.
            Err(_) if !status.is_success() => {
                return Err(ZaloError::Api {
                    code: i32::from(status.as_u16()),
                    description: body,
                })
            }
            Err(e) => return Err(ZaloError::Json(e)),
        };
        if status.is_success() && envelope.ok {
            return Ok(());
        }
        Err(ZaloError::Api {
            code: envelope
                .error_code
                .unwrap_or(i32::from(status.as_u16())),
            description: envelope.description.unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for ZaloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaloClient")
            .field("config", &self.config)
            .finish()
    }
}
