//! Routing of inbound bookings and chat updates.

use std::sync::Arc;

use sheet_store::{to_display_date, AddedBooking, NewBooking, SheetStore};
use telegram_client::Update;
use tracing::{debug, error, info, warn};
use zalo_client::ZaloUpdate;

use crate::conversation::{self, ConversationEngine, SessionUpdate};
use crate::error::RelayError;
use crate::notifier::{AdminNotifier, FAILED_BOOKING_ID};
use crate::rollover::{self, RolloverReport};
use crate::sender::ReplySender;
use crate::session::SessionStore;

/// Name used when a chat platform gives no display name.
pub const DEFAULT_CUSTOMER_NAME: &str = "Khách";

/// Everything needed to handle bookings and chat updates.
#[derive(Clone)]
pub struct Relay {
    store: SheetStore,
    notifier: AdminNotifier,
    sessions: Arc<dyn SessionStore>,
    replies: Arc<dyn ReplySender>,
    engine: ConversationEngine,
}

impl Relay {
    pub fn new(
        store: SheetStore,
        notifier: AdminNotifier,
        sessions: Arc<dyn SessionStore>,
        replies: Arc<dyn ReplySender>,
        engine: ConversationEngine,
    ) -> Self {
        Self {
            store,
            notifier,
            sessions,
            replies,
            engine,
        }
    }

    pub fn store(&self) -> &SheetStore {
        &self.store
    }

    pub fn notifier(&self) -> &AdminNotifier {
        &self.notifier
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Store a booking and alert the admin.
    ///
    /// The admin is alerted even when storing fails, with the ID `ERR`, so
    /// the booking can be followed up by phone. Alert failures are logged
    /// and never fail the submission.
    pub async fn submit_booking(&self, booking: &NewBooking) -> Result<AddedBooking, RelayError> {
        match self.store.add_booking(booking).await {
            Ok(added) => {
                info!(booking_id = %added.id, source = %booking.source, "Booking accepted");
                self.notifier
                    .notify_new_booking(&added.id, booking, &added.date)
                    .await;
                Ok(added)
            }
            Err(e) => {
                error!(source = %booking.source, "Failed to store booking: {}", e);
                self.notifier
                    .notify_new_booking(FAILED_BOOKING_ID, booking, &to_display_date(&booking.date))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Handle a Telegram webhook update from the admin bot.
    ///
    /// Button presses go to the notifier; text from the admin chat is treated
    /// as a command. Anything else is ignored.
    pub async fn handle_telegram_update(&self, update: &Update) {
        if let Some(callback) = &update.callback_query {
            self.notifier.handle_callback(callback).await;
            return;
        }

        let Some(message) = &update.message else {
            debug!(update_id = update.update_id, "Ignoring update without message");
            return;
        };
        let Some(text) = message.text() else {
            debug!(update_id = update.update_id, "Ignoring non-text message");
            return;
        };
        if message.chat.id != self.notifier.admin_chat_id() {
            warn!(chat_id = message.chat.id, "Ignoring command from non-admin chat");
            return;
        }
        self.notifier.handle_command(message.chat.id, text).await;
    }

    /// Handle a Zalo webhook update from a customer.
    pub async fn handle_zalo_update(&self, update: &ZaloUpdate) {
        let Some(message) = update.text_message() else {
            debug!("Ignoring Zalo event that is not a text message");
            return;
        };
        let text = message.text.as_deref().unwrap_or_default();
        let name = message
            .from
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER_NAME);
        self.handle_chat_message(&message.chat.id, text, name).await;
    }

    /// Advance the booking conversation for one customer message.
    pub async fn handle_chat_message(&self, chat_id: &str, text: &str, display_name: &str) {
        let session = self.sessions.get(chat_id).await;
        let step = session.as_ref().map(|s| s.step);
        let turn = self.engine.handle(session, text, display_name);
        debug!(chat_id, ?step, submit = turn.submit.is_some(), "Conversation turn");

        match turn.session {
            SessionUpdate::Keep => {}
            SessionUpdate::Save(session) => self.sessions.put(chat_id, session).await,
            SessionUpdate::Clear => self.sessions.delete(chat_id).await,
        }
        if let Some(reply) = &turn.reply {
            self.reply(chat_id, reply).await;
        }

        let Some(booking) = turn.submit else {
            return;
        };
        match self.submit_booking(&booking).await {
            Ok(added) => {
                self.sessions.delete(chat_id).await;
                let text = conversation::success_message(&added.id, &booking, &added.date);
                self.reply(chat_id, &text).await;
            }
            Err(_) => self.reply(chat_id, conversation::SUBMIT_FAILED).await,
        }
    }

    /// Send the daily summary and clear the sheet.
    pub async fn rollover(&self) -> RolloverReport {
        rollover::run_rollover(self).await
    }

    async fn reply(&self, chat_id: &str, text: &str) {
        if let Err(e) = self.replies.send_text(chat_id, text).await {
            warn!(chat_id, "Failed to reply to customer: {}", e);
        }
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("store", &self.store)
            .field("notifier", &self.notifier)
            .field("engine", &self.engine)
            .finish()
    }
}
