//! Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::types::{
    AnswerCallbackQueryParams, ApiResponse, BotCommand, EditMessageTextParams,
    InlineKeyboardMarkup, SendMessageParams, SentMessage,
};

/// Timeout applied to every Bot API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client with the standard request timeout.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TelegramError::Http)?;
        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Send a message.
    pub async fn send_message(
        &self,
        params: &SendMessageParams,
    ) -> Result<SentMessage, TelegramError> {
        self.call("sendMessage", params).await
    }

    /// Replace the text (and optionally the inline buttons) of a sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let params = EditMessageTextParams {
            chat_id,
            message_id,
            text: text.to_string(),
            parse_mode: Some("HTML".to_string()),
            reply_markup,
        };
        let _: serde_json::Value = self.call("editMessageText", &params).await?;
        Ok(())
    }

    /// Acknowledge an inline button press, optionally showing a toast.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        let params = AnswerCallbackQueryParams {
            callback_query_id: callback_query_id.to_string(),
            text: text.to_string(),
        };
        let _: bool = self.call("answerCallbackQuery", &params).await?;
        Ok(())
    }

    /// Register the command menu shown by the client.
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        let _: bool = self
            .call("setMyCommands", &json!({ "commands": commands }))
            .await?;
        Ok(())
    }

    /// Invoke a Bot API method and unwrap its response envelope.
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("Bot API call: {}", method);

        let response = self
            .http
            .post(self.config.method_url(method))
            .json(params)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<R> = serde_json::from_str(&body).map_err(|e| {
            warn!(method, status = status.as_u16(), "Unparseable Bot API response");
            TelegramError::Json(e)
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or(i32::from(status.as_u16())),
                description: description.unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}
