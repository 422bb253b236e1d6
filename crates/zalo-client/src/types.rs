//! Webhook and request types for the Zalo Bot API.

use serde::{Deserialize, Serialize};

/// Event name of an inbound text message.
pub const TEXT_RECEIVED: &str = "message.text.received";

/// Webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZaloUpdate {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub result: Option<ZaloEvent>,
}

impl ZaloUpdate {
    /// The text message carried by this update, if it is one.
    pub fn text_message(&self) -> Option<&ZaloMessage> {
        let event = self.result.as_ref()?;
        if event.event_name != TEXT_RECEIVED {
            return None;
        }
        event.message.as_ref().filter(|m| m.text.is_some())
    }
}

/// An event inside a webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZaloEvent {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub message: Option<ZaloMessage>,
}

/// A chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZaloMessage {
    #[serde(default)]
    pub chat: ZaloChat,
    #[serde(default)]
    pub from: ZaloSender,
    #[serde(default)]
    pub text: Option<String>,
}

/// Conversation a message belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZaloChat {
    #[serde(default)]
    pub id: String,
}

/// Message author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZaloSender {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}
