//! Inbound update types delivered to the webhook.

use serde::{Deserialize, Serialize};

/// A webhook update. Only the fields the relay reacts to are modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,

    /// A new text (or other) message.
    #[serde(default)]
    pub message: Option<Message>,

    /// An inline keyboard button press.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,

    pub chat: Chat,

    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,

    /// Text content; `None` for stickers, photos, etc.
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Trimmed text, if the message has any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim)
    }
}

/// Chat a message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A Telegram user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub username: Option<String>,
}

/// Callback from an inline keyboard button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Query ID, needed to acknowledge the press.
    pub id: String,

    pub from: User,

    /// Message the button was attached to.
    #[serde(default)]
    pub message: Option<Message>,

    /// The button's callback data tag.
    #[serde(default)]
    pub data: Option<String>,
}
