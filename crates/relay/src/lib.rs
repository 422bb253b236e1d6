//! Booking relay between the website, customer chats and the admin chat.
//!
//! # Architecture
//!
//! ```text
//! Website form ─┐
//!               ├─> Relay::submit_booking ──> SheetStore ──> Google Sheets
//! Zalo webhook ─┤        │
//!   (ConversationEngine) └─> AdminNotifier ──> Telegram admin chat
//!                                  ▲
//! Telegram webhook ────────────────┘  (buttons, commands)
//!
//! TaskQueue: webhook work runs on one background worker
//! Rollover:  00:00-00:10 shop time, summary then clear
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use relay::{
//!     AdminNotifier, ConversationEngine, InMemorySessionStore, RecordingSender, Relay,
//! };
//! use sheet_store::{BookingSource, MemorySheet, SheetStore, ShopClock, StoreConfig};
//!
//! # async fn example() {
//! let store = SheetStore::new(Arc::new(MemorySheet::new()), ShopClock::default(), StoreConfig::default());
//! let sender = RecordingSender::new();
//! let notifier = AdminNotifier::new(Arc::new(sender.clone()), store.clone(), -100123);
//! let relay = Relay::new(
//!     store,
//!     notifier,
//!     Arc::new(InMemorySessionStore::new()),
//!     Arc::new(sender),
//!     ConversationEngine::new(ShopClock::default(), BookingSource::Zalo),
//! );
//! relay.handle_chat_message("chat-1", "đặt lịch", "Lan").await;
//! # }
//! ```

pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod formatting;
pub mod notifier;
pub mod queue;
pub mod rollover;
pub mod sender;
pub mod services;
pub mod session;
pub mod template;
pub mod validation;

pub use conversation::{ConversationEngine, SessionUpdate, Turn};
pub use dispatch::Relay;
pub use error::RelayError;
pub use form::{BookingForm, MissingFields};
pub use notifier::{AdminCommand, AdminNotifier, CallbackAction};
pub use queue::{QueueStats, TaskQueue};
pub use rollover::{run_rollover, spawn_rollover_loop, RolloverReport, RolloverSchedule};
pub use sender::{
    Button, ButtonAction, ChatSender, RecordingSender, ReplySender, SentItem, TelegramSender,
    ZaloSender,
};
pub use session::{BookingDraft, InMemorySessionStore, Session, SessionStore, Step};
