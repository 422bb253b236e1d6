//! Outbound chat transports.
//!
//! [`ChatSender`] talks to the admin chat (Telegram), [`ReplySender`] answers
//! customers on the booking chat platform (Zalo). Both are traits so the
//! relay can be driven by [`RecordingSender`] in tests.

use std::sync::Arc;

use async_trait::async_trait;
use telegram_client::{
    BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, ReplyKeyboardMarkup,
    SendMessageParams, TelegramClient,
};
use tokio::sync::Mutex;
use zalo_client::ZaloClient;

use crate::error::RelayError;

/// Labels of the persistent admin keyboard, row by row.
pub const ADMIN_KEYBOARD: [[&str; 2]; 3] = [
    ["📅 Hôm nay", "📅 Ngày mai"],
    ["⏳ Chờ xác nhận", "✅ Hoàn thành"],
    ["📊 Thống kê", "❓ Hướng dẫn"],
];

/// What pressing an inline button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Send a callback tag back to the bot.
    Callback(String),
    /// Open an `https://` or `tg://` link.
    Url(String),
}

/// An inline button under an admin message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(tag.into()),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Admin chat transport.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Send a message with the persistent admin keyboard.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), RelayError>;

    /// Send a message with inline buttons.
    async fn send_with_buttons(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Vec<Vec<Button>>,
    ) -> Result<(), RelayError>;

    /// Replace the text of a sent message; `None` removes its buttons.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: Option<Vec<Vec<Button>>>,
    ) -> Result<(), RelayError>;

    /// Acknowledge a button press with a short toast.
    async fn acknowledge_callback(&self, callback_id: &str, text: &str)
        -> Result<(), RelayError>;

    /// Register the bot command menu as `(command, description)` pairs.
    async fn set_commands(&self, commands: &[(&str, &str)]) -> Result<(), RelayError>;
}

/// Customer chat transport.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send a plain-text reply.
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), RelayError>;
}

/// [`ChatSender`] over the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    fn admin_keyboard() -> ReplyKeyboardMarkup {
        let rows: Vec<&[&str]> = ADMIN_KEYBOARD.iter().map(|row| row.as_slice()).collect();
        ReplyKeyboardMarkup::from_rows(&rows)
    }

    fn inline_markup(buttons: Vec<Vec<Button>>) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: buttons
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|button| match button.action {
                            ButtonAction::Callback(tag) => {
                                InlineKeyboardButton::callback(button.text, tag)
                            }
                            ButtonAction::Url(url) => InlineKeyboardButton::url(button.text, url),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ChatSender for TelegramSender {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), RelayError> {
        let params = SendMessageParams::html(chat_id, text).with_markup(Self::admin_keyboard());
        self.client.send_message(&params).await?;
        Ok(())
    }

    async fn send_with_buttons(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Vec<Vec<Button>>,
    ) -> Result<(), RelayError> {
        let params =
            SendMessageParams::html(chat_id, text).with_markup(Self::inline_markup(buttons));
        self.client.send_message(&params).await?;
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: Option<Vec<Vec<Button>>>,
    ) -> Result<(), RelayError> {
        self.client
            .edit_message_text(chat_id, message_id, text, buttons.map(Self::inline_markup))
            .await?;
        Ok(())
    }

    async fn acknowledge_callback(
        &self,
        callback_id: &str,
        text: &str,
    ) -> Result<(), RelayError> {
        self.client.answer_callback_query(callback_id, text).await?;
        Ok(())
    }

    async fn set_commands(&self, commands: &[(&str, &str)]) -> Result<(), RelayError> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|(command, description)| BotCommand::new(*command, *description))
            .collect();
        self.client.set_my_commands(&commands).await?;
        Ok(())
    }
}

/// [`ReplySender`] over the Zalo Bot API.
#[derive(Debug, Clone)]
pub struct ZaloSender {
    client: ZaloClient,
}

impl ZaloSender {
    pub fn new(client: ZaloClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReplySender for ZaloSender {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), RelayError> {
        self.client.send_message(chat_id, text).await?;
        Ok(())
    }
}

/// A call captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentItem {
    Message {
        chat_id: i64,
        text: String,
    },
    Buttons {
        chat_id: i64,
        text: String,
        buttons: Vec<Vec<Button>>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        buttons: Option<Vec<Vec<Button>>>,
    },
    CallbackAck {
        callback_id: String,
        text: String,
    },
    Commands(Vec<String>),
    Reply {
        chat_id: String,
        text: String,
    },
}

impl SentItem {
    /// Text carried by the item, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message { text, .. }
            | Self::Buttons { text, .. }
            | Self::Edit { text, .. }
            | Self::CallbackAck { text, .. }
            | Self::Reply { text, .. } => Some(text.as_str()),
            Self::Commands(_) => None,
        }
    }
}

/// Sender that records every call instead of delivering it.
///
/// Implements both transports. A failing recorder still records the call
/// and then returns an error.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<SentItem>>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose every call fails.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    /// Everything recorded so far.
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.lock().await.clone()
    }

    /// Forget recorded calls.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    async fn record(&self, item: SentItem) -> Result<(), RelayError> {
        self.sent.lock().await.push(item);
        if self.fail {
            return Err(RelayError::SendFailed("recording sender set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), RelayError> {
        self.record(SentItem::Message {
            chat_id,
            text: text.to_string(),
        })
        .await
    }

    async fn send_with_buttons(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Vec<Vec<Button>>,
    ) -> Result<(), RelayError> {
        self.record(SentItem::Buttons {
            chat_id,
            text: text.to_string(),
            buttons,
        })
        .await
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        buttons: Option<Vec<Vec<Button>>>,
    ) -> Result<(), RelayError> {
        self.record(SentItem::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            buttons,
        })
        .await
    }

    async fn acknowledge_callback(
        &self,
        callback_id: &str,
        text: &str,
    ) -> Result<(), RelayError> {
        self.record(SentItem::CallbackAck {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
        })
        .await
    }

    async fn set_commands(&self, commands: &[(&str, &str)]) -> Result<(), RelayError> {
        let names = commands.iter().map(|(c, _)| c.to_string()).collect();
        self.record(SentItem::Commands(names)).await
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), RelayError> {
        self.record(SentItem::Reply {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        })
        .await
    }
}
