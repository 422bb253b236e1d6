//! Admin chat: booking alerts, status buttons, commands and reports.

use std::sync::Arc;

use chrono::Duration;
use sheet_store::{display_date, BookingStatus, NewBooking, SheetStore};
use telegram_client::CallbackQuery;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::formatting;
use crate::sender::{Button, ChatSender};

/// Booking ID shown in alerts when the booking could not be stored.
pub const FAILED_BOOKING_ID: &str = "ERR";

/// Command menu registered on `/start` and `/help`.
pub const BOT_COMMANDS: [(&str, &str); 7] = [
    ("start", "🏠 Bắt đầu"),
    ("today", "📅 Lịch hôm nay"),
    ("tomorrow", "📅 Lịch ngày mai"),
    ("all", "⏳ Đơn chờ xác nhận"),
    ("done", "✅ Đơn hoàn thành"),
    ("stats", "📊 Thống kê"),
    ("help", "❓ Hướng dẫn"),
];

/// Reply to text that is not a known command.
pub const COMMAND_HINT: &str = "Bấm nút bên dưới hoặc gõ /help để xem hướng dẫn.";

/// Action encoded in an inline button's callback tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Confirm,
    Reject,
    Complete,
}

impl CallbackAction {
    /// Tag prefix, e.g. `confirm_`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Confirm => "confirm_",
            Self::Reject => "reject_",
            Self::Complete => "complete_",
        }
    }

    /// Status the booking moves to.
    pub fn target_status(self) -> BookingStatus {
        match self {
            Self::Confirm => BookingStatus::Confirmed,
            Self::Reject => BookingStatus::Rejected,
            Self::Complete => BookingStatus::Completed,
        }
    }

    /// Tag for a booking.
    pub fn tag(self, booking_id: &str) -> String {
        format!("{}{}", self.prefix(), booking_id)
    }

    fn toast(self) -> &'static str {
        match self {
            Self::Confirm => "✅ Đã xác nhận!",
            Self::Reject => "❌ Đã từ chối!",
            Self::Complete => "✅ Đã hoàn thành!",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Confirm => "xác nhận",
            Self::Reject => "từ chối",
            Self::Complete => "hoàn thành",
        }
    }
}

/// Split a callback tag into its action and booking ID.
pub fn parse_callback(tag: &str) -> Option<(CallbackAction, &str)> {
    [
        CallbackAction::Confirm,
        CallbackAction::Reject,
        CallbackAction::Complete,
    ]
    .into_iter()
    .find_map(|action| {
        tag.strip_prefix(action.prefix())
            .filter(|id| !id.is_empty())
            .map(|id| (action, id))
    })
}

/// Admin text command, typed or sent by a keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Help,
    Today,
    Tomorrow,
    Pending,
    Done,
    Find(String),
    Stats,
    Unknown,
}

impl AdminCommand {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        // "/today@ShopBot" in group chats
        let head = match head.split_once('@') {
            Some((command, _)) if command.starts_with('/') => command,
            _ => head,
        };

        match head {
            "/find" => return Self::Find(rest.to_string()),
            "/start" | "/help" => return Self::Help,
            "/today" => return Self::Today,
            "/tomorrow" => return Self::Tomorrow,
            "/all" => return Self::Pending,
            "/done" => return Self::Done,
            "/stats" => return Self::Stats,
            _ => {}
        }

        match text {
            "❓ Hướng dẫn" => Self::Help,
            "📅 Hôm nay" => Self::Today,
            "📅 Ngày mai" => Self::Tomorrow,
            "⏳ Chờ xác nhận" => Self::Pending,
            "✅ Hoàn thành" => Self::Done,
            "📊 Thống kê" => Self::Stats,
            _ => Self::Unknown,
        }
    }
}

/// Sends alerts to and handles input from the admin chat.
#[derive(Clone)]
pub struct AdminNotifier {
    sender: Arc<dyn ChatSender>,
    store: SheetStore,
    admin_chat_id: i64,
}

impl AdminNotifier {
    pub fn new(sender: Arc<dyn ChatSender>, store: SheetStore, admin_chat_id: i64) -> Self {
        Self {
            sender,
            store,
            admin_chat_id,
        }
    }

    /// Chat that receives alerts and reports.
    pub fn admin_chat_id(&self) -> i64 {
        self.admin_chat_id
    }

    /// Alert the admin about a new booking.
    ///
    /// Failures are logged; returns whether the alert was delivered.
    pub async fn notify_new_booking(
        &self,
        booking_id: &str,
        booking: &NewBooking,
        display_date: &str,
    ) -> bool {
        let text = formatting::new_booking_message(
            booking_id,
            booking,
            display_date,
            &self.store.clock().timestamp(),
        );

        let delivery = if booking_id == FAILED_BOOKING_ID {
            self.sender.send_message(self.admin_chat_id, &text).await
        } else {
            let buttons = vec![vec![
                Button::callback("✅ Xác nhận", CallbackAction::Confirm.tag(booking_id)),
                Button::callback("❌ Từ chối", CallbackAction::Reject.tag(booking_id)),
            ]];
            self.sender
                .send_with_buttons(self.admin_chat_id, &text, buttons)
                .await
        };

        match delivery {
            Ok(()) => {
                info!(booking_id, "Admin notified of new booking");
                true
            }
            Err(e) => {
                warn!(booking_id, "Failed to notify admin: {}", e);
                false
            }
        }
    }

    /// Apply an inline button press.
    pub async fn handle_callback(&self, callback: &CallbackQuery) {
        let tag = callback.data.as_deref().unwrap_or_default();
        let Some((action, booking_id)) = parse_callback(tag) else {
            debug!("Ignoring callback tag {:?}", tag);
            self.acknowledge(&callback.id, "").await;
            return;
        };

        let status = action.target_status();
        match self.store.update_status(booking_id, status).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.acknowledge(&callback.id, "⚠️ Không thể cập nhật!").await;
                let warning = format!(
                    "⚠️ Không tìm thấy đơn <b>{}</b> ở trạng thái có thể {}.",
                    formatting::escape_html(booking_id),
                    action.verb()
                );
                self.send(self.admin_chat_id, &warning).await;
                return;
            }
            Err(e) => {
                error!(booking_id, "Status update failed: {}", e);
                self.acknowledge(&callback.id, "⚠️ Lỗi cập nhật, thử lại sau!")
                    .await;
                return;
            }
        }

        self.acknowledge(&callback.id, action.toast()).await;

        let Some(message) = &callback.message else {
            return;
        };
        let original = message.text.as_deref().unwrap_or_default();
        let text = formatting::with_status_line(original, status, &self.store.clock().timestamp());
        let buttons = (action == CallbackAction::Confirm).then(|| {
            vec![vec![Button::callback(
                "✂️ Hoàn thành",
                CallbackAction::Complete.tag(booking_id),
            )]]
        });

        if let Err(e) = self
            .sender
            .edit_message(message.chat.id, message.message_id, &text, buttons)
            .await
        {
            warn!(booking_id, "Failed to edit alert: {}", e);
        }
    }

    /// Answer an admin text command.
    pub async fn handle_command(&self, chat_id: i64, text: &str) {
        let command = AdminCommand::parse(text);
        debug!(chat_id, ?command, "Admin command");

        let reply = match self.render_command(&command).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Admin command {:?} failed: {}", command, e);
                "⚠️ Không đọc được dữ liệu, vui lòng thử lại sau.".to_string()
            }
        };
        self.send(chat_id, &reply).await;
    }

    async fn render_command(&self, command: &AdminCommand) -> Result<String, RelayError> {
        let clock = self.store.clock();
        let reply = match command {
            AdminCommand::Help => {
                if let Err(e) = self.sender.set_commands(&BOT_COMMANDS).await {
                    warn!("Failed to register bot commands: {}", e);
                }
                formatting::help_message()
            }
            AdminCommand::Today => {
                let date = clock.today_display();
                let bookings = self.store.get_bookings_by_date(&date).await?;
                formatting::day_listing("Hôm nay", &date, &bookings)
            }
            AdminCommand::Tomorrow => {
                let date = display_date(clock.today() + Duration::days(1));
                let bookings = self.store.get_bookings_by_date(&date).await?;
                formatting::day_listing("Ngày mai", &date, &bookings)
            }
            AdminCommand::Pending => {
                let bookings = self
                    .store
                    .get_bookings_by_status(BookingStatus::Pending)
                    .await?;
                formatting::status_listing(BookingStatus::Pending, &bookings)
            }
            AdminCommand::Done => {
                let bookings = self
                    .store
                    .get_bookings_by_status(BookingStatus::Completed)
                    .await?;
                formatting::status_listing(BookingStatus::Completed, &bookings)
            }
            AdminCommand::Find(keyword) if keyword.is_empty() => {
                "⚠️ Nhập: /find 0901234567".to_string()
            }
            AdminCommand::Find(keyword) => {
                let bookings = self.store.find_booking(keyword).await?;
                formatting::search_results(keyword, &bookings)
            }
            AdminCommand::Stats => formatting::stats_message(&self.store.get_stats().await?),
            AdminCommand::Unknown => COMMAND_HINT.to_string(),
        };
        Ok(reply)
    }

    /// Send the end-of-day report to the admin chat.
    pub async fn send_daily_summary(&self) -> Result<(), RelayError> {
        let clock = self.store.clock();
        let text = match self.store.get_daily_summary().await? {
            Some(summary) => formatting::daily_summary_message(&summary, &clock.timestamp()),
            None => formatting::empty_summary_message(&clock.today_display()),
        };
        self.sender.send_message(self.admin_chat_id, &text).await?;
        info!("Daily summary sent");
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.sender.send_message(chat_id, text).await {
            warn!(chat_id, "Failed to send admin message: {}", e);
        }
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) {
        if let Err(e) = self.sender.acknowledge_callback(callback_id, text).await {
            warn!("Failed to acknowledge callback: {}", e);
        }
    }
}

impl std::fmt::Debug for AdminNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminNotifier")
            .field("store", &self.store)
            .field("admin_chat_id", &self.admin_chat_id)
            .finish()
    }
}
