//! Guided booking conversation.
//!
//! [`ConversationEngine::handle`] is pure: given the current session and an
//! inbound message it returns a [`Turn`] describing the reply, what to do with
//! the session, and whether a booking should be submitted. The dispatch layer
//! applies it.

use chrono::Duration;
use sheet_store::{display_date, BookingSource, NewBooking, ShopClock};

use crate::services;
use crate::session::{BookingDraft, Session, Step};
use crate::template;
use crate::validation::{self, DateError, TIME_SLOTS};

const RULE: &str = "━━━━━━━━━━━━━━━";

const CANCEL_KEYWORDS: [&str; 5] = ["hủy", "huỷ", "huy", "cancel", "/cancel"];
const GREETING_KEYWORDS: [&str; 6] = ["/start", "hi", "hello", "xin chào", "chào", "start"];
const MENU_KEYWORDS: [&str; 7] = [
    "menu", "dịch vụ", "bảng giá", "giá", "dich vu", "bang gia", "gia",
];
const BOOKING_KEYWORDS: [&str; 4] = ["đặt lịch", "dat lich", "book", "/book"];

/// Reply when a message matches nothing and no booking is in progress.
pub const IDLE_HINT: &str =
    "Xin chào! Gõ 'đặt lịch' để đặt lịch cắt tóc hoặc 'menu' để xem bảng giá.";

/// Reply after a cancel.
pub const CANCELLED: &str = "❌ Đã hủy đặt lịch. Gõ 'đặt lịch' khi bạn muốn đặt lại.";

/// Reply when a confirmed booking could not be stored.
pub const SUBMIT_FAILED: &str =
    "⚠️ Hệ thống đang bận, chưa lưu được lịch hẹn. Gõ 1 để gửi lại hoặc 'hủy' để hủy.";

/// What to do with the chat's session after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Leave the stored session as it is.
    Keep,
    /// Store this session.
    Save(Session),
    /// Delete the session.
    Clear,
}

/// Outcome of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Message to send back, if any.
    pub reply: Option<String>,
    pub session: SessionUpdate,
    /// Booking to persist. The session is cleared if it is stored and kept
    /// otherwise.
    pub submit: Option<NewBooking>,
}

impl Turn {
    fn reply(text: impl Into<String>, session: SessionUpdate) -> Self {
        Self {
            reply: Some(text.into()),
            session,
            submit: None,
        }
    }

    fn submit(booking: NewBooking) -> Self {
        Self {
            reply: None,
            session: SessionUpdate::Keep,
            submit: Some(booking),
        }
    }
}

/// Conversation rules for one chat platform.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    clock: ShopClock,
    source: BookingSource,
}

impl ConversationEngine {
    pub fn new(clock: ShopClock, source: BookingSource) -> Self {
        Self { clock, source }
    }

    /// Platform recorded on bookings made through this engine.
    pub fn source(&self) -> BookingSource {
        self.source
    }

    /// Process one inbound message.
    ///
    /// Keywords are checked before the current step, so cancel, greeting,
    /// menu and booking keywords work at any point of the flow.
    pub fn handle(&self, session: Option<Session>, text: &str, display_name: &str) -> Turn {
        let text = text.trim();
        let lower = text.to_lowercase();
        let keyword = lower.as_str();

        if CANCEL_KEYWORDS.contains(&keyword) {
            return Turn::reply(CANCELLED, SessionUpdate::Clear);
        }
        if GREETING_KEYWORDS.contains(&keyword) {
            return Turn::reply(welcome_message(), SessionUpdate::Clear);
        }
        if MENU_KEYWORDS.contains(&keyword) {
            return Turn::reply(services::price_list(), SessionUpdate::Keep);
        }
        if BOOKING_KEYWORDS.contains(&keyword) {
            return Turn::reply(
                service_prompt(),
                SessionUpdate::Save(Session::start(display_name)),
            );
        }
        if template::is_template(text) {
            return match template::parse_template(text, display_name, self.source) {
                Ok(booking) => Turn::submit(booking),
                Err(_) => Turn::reply(template::MISSING_CONTACT_HINT, SessionUpdate::Keep),
            };
        }

        match session {
            Some(session) => self.advance(session, text),
            None => Turn::reply(IDLE_HINT, SessionUpdate::Keep),
        }
    }

    fn advance(&self, mut session: Session, input: &str) -> Turn {
        match session.step {
            Step::SelectService => match services::by_menu_number(input) {
                Some(service) => {
                    let reply = format!(
                        "✅ Dịch vụ: {}\n\n👤 Vui lòng nhập họ tên của bạn:",
                        service.label()
                    );
                    session.draft.service = Some(service.label());
                    Turn::reply(reply, SessionUpdate::Save(session.advance(Step::EnterName)))
                }
                None => Turn::reply(
                    format!("⚠️ Vui lòng chọn số từ 1 đến 6.\n\n{}", service_prompt()),
                    SessionUpdate::Keep,
                ),
            },
            Step::EnterName => match validation::validate_name(input) {
                Some(name) => {
                    session.draft.name = Some(name);
                    Turn::reply(
                        "📞 Nhập số điện thoại liên hệ:",
                        SessionUpdate::Save(session.advance(Step::EnterPhone)),
                    )
                }
                None => Turn::reply(
                    "⚠️ Tên phải có ít nhất 2 ký tự. Vui lòng nhập lại họ tên:",
                    SessionUpdate::Keep,
                ),
            },
            Step::EnterPhone => match validation::normalize_phone(input) {
                Some(phone) => {
                    session.draft.phone = Some(phone);
                    Turn::reply(
                        self.date_prompt(),
                        SessionUpdate::Save(session.advance(Step::EnterDate)),
                    )
                }
                None => Turn::reply(
                    "⚠️ Số điện thoại không hợp lệ (ví dụ: 0901234567). Vui lòng nhập lại:",
                    SessionUpdate::Keep,
                ),
            },
            Step::EnterDate => match validation::parse_date_choice(input, self.clock.today()) {
                Ok(date) => {
                    session.draft.date = Some(display_date(date));
                    Turn::reply(time_prompt(), SessionUpdate::Save(session.advance(Step::EnterTime)))
                }
                Err(DateError::Past) => Turn::reply(
                    format!("⚠️ Không thể đặt ngày đã qua.\n\n{}", self.date_prompt()),
                    SessionUpdate::Keep,
                ),
                Err(DateError::Invalid) => Turn::reply(
                    format!("⚠️ Ngày không hợp lệ.\n\n{}", self.date_prompt()),
                    SessionUpdate::Keep,
                ),
            },
            Step::EnterTime => match validation::parse_time_choice(input) {
                Some(time) => {
                    session.draft.time = Some(time);
                    Turn::reply(
                        "📝 Ghi chú thêm (kiểu tóc, yêu cầu...)?\nGõ 0 nếu không có.",
                        SessionUpdate::Save(session.advance(Step::EnterNote)),
                    )
                }
                None => Turn::reply(
                    format!("⚠️ Giờ không hợp lệ.\n\n{}", time_prompt()),
                    SessionUpdate::Keep,
                ),
            },
            Step::EnterNote => {
                session.draft.note = (input != "0" && !input.is_empty()).then(|| input.to_string());
                let summary = confirm_prompt(&session.draft);
                Turn::reply(summary, SessionUpdate::Save(session.advance(Step::Confirm)))
            }
            Step::Confirm => match input {
                "1" => match self.booking_from(&session.draft) {
                    Some(booking) => Turn::submit(booking),
                    None => Turn::reply(
                        service_prompt(),
                        SessionUpdate::Save(Session::start(session.display_name)),
                    ),
                },
                "2" => Turn::reply(CANCELLED, SessionUpdate::Clear),
                "3" => Turn::reply(
                    format!("🔄 Làm lại từ đầu.\n\n{}", service_prompt()),
                    SessionUpdate::Save(Session::start(session.display_name)),
                ),
                _ => Turn::reply(
                    format!(
                        "⚠️ Vui lòng gõ 1, 2 hoặc 3.\n\n{}",
                        confirm_prompt(&session.draft)
                    ),
                    SessionUpdate::Keep,
                ),
            },
        }
    }

    fn booking_from(&self, draft: &BookingDraft) -> Option<NewBooking> {
        Some(NewBooking {
            fullname: draft.name.clone()?,
            phone: draft.phone.clone()?,
            service: draft.service.clone()?,
            date: draft.date.clone()?,
            time: draft.time.clone()?,
            email: None,
            note: draft.note.clone(),
            source: self.source,
        })
    }

    fn date_prompt(&self) -> String {
        let today = self.clock.today();
        format!(
            "📅 Chọn ngày:\n1. Hôm nay ({})\n2. Ngày mai ({})\n\nHoặc nhập ngày dạng dd/mm/yyyy",
            display_date(today),
            display_date(today + Duration::days(1))
        )
    }
}

/// Welcome screen for greeting keywords.
pub fn welcome_message() -> String {
    format!(
        "✂️ BarberShop - Đặt Lịch Cắt Tóc\n{}\n\n\
         Chào bạn! Gõ 'đặt lịch' để đặt lịch từng bước, hoặc 'menu' để xem bảng giá.\n\n\
         Bạn cũng có thể gửi nhanh theo mẫu:\n\n{}\n\n{}\n📋 Dịch vụ có sẵn:\n{}",
        RULE,
        template::TEMPLATE_EXAMPLE,
        RULE,
        services::menu_lines()
    )
}

/// Reply after a booking has been stored.
pub fn success_message(booking_id: &str, booking: &NewBooking, display_date: &str) -> String {
    format!(
        "✅ Đặt lịch thành công!\n\n\
         🆔 Mã: {}\n\
         👤 Khách: {}\n\
         📅 Ngày: {}\n\
         🕐 Giờ: {}\n\
         💈 Dịch vụ: {}\n\n\
         Chúng tôi sẽ liên hệ xác nhận sớm nhất!",
        booking_id,
        booking.fullname,
        display_date,
        or_unset(&booking.time),
        or_unset(&booking.service),
    )
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "Chưa chọn"
    } else {
        value
    }
}

fn service_prompt() -> String {
    format!(
        "💈 Chọn dịch vụ (gõ số):\n\n{}\n\nGõ 'hủy' để hủy bất cứ lúc nào.",
        services::menu_lines()
    )
}

fn time_prompt() -> String {
    let slots = TIME_SLOTS
        .iter()
        .enumerate()
        .map(|(i, slot)| format!("{}. {}", i + 1, slot))
        .collect::<Vec<_>>()
        .join("\n");
    format!("🕐 Chọn giờ:\n{}\n\nHoặc nhập giờ dạng HH:MM", slots)
}

fn confirm_prompt(draft: &BookingDraft) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    format!(
        "📋 XÁC NHẬN ĐẶT LỊCH\n{}\n\n\
         💈 Dịch vụ: {}\n\
         👤 Họ tên: {}\n\
         📞 SĐT: {}\n\
         📅 Ngày: {}\n\
         🕐 Giờ: {}\n\
         📝 Ghi chú: {}\n\n\
         1. ✅ Xác nhận\n\
         2. ❌ Hủy\n\
         3. 🔄 Làm lại",
        RULE,
        field(&draft.service),
        field(&draft.name),
        field(&draft.phone),
        field(&draft.date),
        field(&draft.time),
        draft.note.as_deref().unwrap_or("Không"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ConversationEngine {
        ConversationEngine::new(ShopClock::default(), BookingSource::Zalo)
    }

    /// Feed messages through the engine, applying session updates.
    fn run(
        engine: &ConversationEngine,
        mut session: Option<Session>,
        inputs: &[&str],
    ) -> (Option<Session>, Turn) {
        let mut last = None;
        for input in inputs {
            let turn = engine.handle(session.clone(), input, "Lan");
            match &turn.session {
                SessionUpdate::Keep => {}
                SessionUpdate::Save(s) => session = Some(s.clone()),
                SessionUpdate::Clear => session = None,
            }
            last = Some(turn);
        }
        (session, last.expect("at least one input"))
    }

    #[test]
    fn test_booking_keyword_starts_flow() {
        let turn = engine().handle(None, "Đặt lịch", "Lan");
        assert_eq!(turn.session, SessionUpdate::Save(Session::start("Lan")));
        assert!(turn.reply.unwrap().contains("1. Cắt Tóc Nam - 100K"));
    }

    #[test]
    fn test_full_flow_submits_booking() {
        let engine = engine();
        let (session, turn) = run(
            &engine,
            None,
            &["book", "6", "Nguyễn Văn A", "090 123 4567", "2", "3", "Undercut", "1"],
        );

        assert_eq!(session.map(|s| s.step), Some(Step::Confirm));
        assert_eq!(turn.session, SessionUpdate::Keep);
        let booking = turn.submit.unwrap();
        assert_eq!(booking.fullname, "Nguyễn Văn A");
        assert_eq!(booking.phone, "0901234567");
        assert_eq!(booking.service, "Combo VIP - 350K");
        assert_eq!(
            booking.date,
            display_date(ShopClock::default().today() + Duration::days(1))
        );
        assert_eq!(booking.time, "14:00");
        assert_eq!(booking.note.as_deref(), Some("Undercut"));
        assert_eq!(booking.source, BookingSource::Zalo);
    }

    #[test]
    fn test_invalid_phone_does_not_advance() {
        let engine = engine();
        let (session, turn) = run(&engine, None, &["book", "1", "An", "12345"]);
        assert_eq!(session.map(|s| s.step), Some(Step::EnterPhone));
        assert_eq!(turn.session, SessionUpdate::Keep);
        assert!(turn.reply.unwrap().contains("không hợp lệ"));
    }

    #[test]
    fn test_invalid_inputs_never_advance() {
        let engine = engine();
        let cases: [(&[&str], Step); 5] = [
            (&["book", "9"], Step::SelectService),
            (&["book", "1", "A"], Step::EnterName),
            (&["book", "1", "An", "0901234567", "01/01/2020"], Step::EnterDate),
            (&["book", "1", "An", "0901234567", "1", "25:00"], Step::EnterTime),
            (&["book", "1", "An", "0901234567", "1", "1", "0", "5"], Step::Confirm),
        ];
        for (inputs, step) in cases {
            let (session, turn) = run(&engine, None, inputs);
            assert_eq!(session.map(|s| s.step), Some(step), "inputs: {:?}", inputs);
            assert_eq!(turn.session, SessionUpdate::Keep);
            assert!(turn.submit.is_none());
        }
    }

    #[test]
    fn test_past_date_message() {
        let engine = engine();
        let (_, turn) = run(&engine, None, &["book", "1", "An", "0901234567", "01/01/2020"]);
        assert!(turn.reply.unwrap().contains("ngày đã qua"));
    }

    #[test]
    fn test_note_zero_means_none() {
        let engine = engine();
        let (session, turn) = run(&engine, None, &["book", "1", "An", "0901234567", "1", "1", "0"]);
        assert_eq!(session.unwrap().draft.note, None);
        assert!(turn.reply.unwrap().contains("📝 Ghi chú: Không"));
    }

    #[test]
    fn test_cancel_from_any_step_clears() {
        let engine = engine();
        let prefixes: [(&[&str], Step); 7] = [
            (&["book"], Step::SelectService),
            (&["book", "1"], Step::EnterName),
            (&["book", "1", "An"], Step::EnterPhone),
            (&["book", "1", "An", "0901234567"], Step::EnterDate),
            (&["book", "1", "An", "0901234567", "1"], Step::EnterTime),
            (&["book", "1", "An", "0901234567", "1", "1"], Step::EnterNote),
            (&["book", "1", "An", "0901234567", "1", "1", "0"], Step::Confirm),
        ];
        for (prefix, step) in prefixes {
            let (session, _) = run(&engine, None, prefix);
            assert_eq!(session.map(|s| s.step), Some(step));

            let mut inputs = prefix.to_vec();
            inputs.push("Hủy");
            let (session, turn) = run(&engine, None, &inputs);
            assert!(session.is_none());
            assert_eq!(turn.session, SessionUpdate::Clear);

            let (session, _) = run(&engine, session, &["book"]);
            assert_eq!(session.map(|s| s.step), Some(Step::SelectService));
        }
    }

    #[test]
    fn test_confirm_cancel_and_restart() {
        let engine = engine();
        let answers = ["book", "2", "An", "0901234567", "1", "2", "0"];

        let mut inputs = answers.to_vec();
        inputs.push("2");
        let (session, turn) = run(&engine, None, &inputs);
        assert!(session.is_none());
        assert_eq!(turn.reply.as_deref(), Some(CANCELLED));

        let mut inputs = answers.to_vec();
        inputs.push("3");
        let (session, turn) = run(&engine, None, &inputs);
        let session = session.unwrap();
        assert_eq!(session.step, Step::SelectService);
        assert_eq!(session.draft, BookingDraft::default());
        assert_eq!(session.display_name, "Lan");
        assert!(turn.reply.unwrap().contains("Làm lại"));
    }

    #[test]
    fn test_menu_keyword_keeps_session() {
        let engine = engine();
        let (session, turn) = run(&engine, None, &["book", "1", "menu"]);
        assert_eq!(turn.session, SessionUpdate::Keep);
        assert!(turn.reply.unwrap().contains("BẢNG GIÁ"));
        assert_eq!(session.map(|s| s.step), Some(Step::EnterName));
    }

    #[test]
    fn test_greeting_resets_to_welcome() {
        let engine = engine();
        let (session, turn) = run(&engine, None, &["book", "1", "Xin chào"]);
        assert!(session.is_none());
        assert!(turn.reply.unwrap().contains("DATLICH"));
    }

    #[test]
    fn test_idle_message_gets_hint() {
        let turn = engine().handle(None, "bao nhiêu tiền?", "Lan");
        assert_eq!(turn.reply.as_deref(), Some(IDLE_HINT));
        assert_eq!(turn.session, SessionUpdate::Keep);
    }

    #[test]
    fn test_template_shortcut() {
        let turn = engine().handle(None, template::TEMPLATE_EXAMPLE, "Lan");
        let booking = turn.submit.unwrap();
        assert_eq!(booking.fullname, "Nguyễn Văn A");
        assert_eq!(booking.source, BookingSource::Zalo);

        let turn = engine().handle(None, "DATLICH\nDịch vụ: 1", "");
        assert_eq!(turn.reply.as_deref(), Some(template::MISSING_CONTACT_HINT));
        assert!(turn.submit.is_none());
    }

    #[test]
    fn test_success_message() {
        let booking = NewBooking {
            fullname: "An".to_string(),
            phone: "0901234567".to_string(),
            ..Default::default()
        };
        let msg = success_message("DUC03", &booking, "20/02/2026");
        assert!(msg.contains("🆔 Mã: DUC03"));
        assert!(msg.contains("🕐 Giờ: Chưa chọn"));
    }
}
