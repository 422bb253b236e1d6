//! Admin chat message templates (Telegram HTML).

use sheet_store::{Booking, BookingStatus, DailySummary, NewBooking, Stats};

const RULE: &str = "━━━━━━━━━━━━━━━";

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// New-booking alert sent to the admin chat.
pub fn new_booking_message(
    id: &str,
    booking: &NewBooking,
    display_date: &str,
    received_at: &str,
) -> String {
    let mut msg = format!(
        "✂️ <b>LỊCH HẸN MỚI</b> ✂️\n{}\n\n\
         🆔 <b>Mã:</b> {}\n\
         👤 <b>Khách hàng:</b> {}\n\
         📞 <b>SĐT:</b> {}\n",
        RULE,
        escape_html(id),
        escape_html(&booking.fullname),
        escape_html(&booking.phone),
    );
    if let Some(email) = booking.email.as_deref().filter(|e| !e.is_empty()) {
        msg.push_str(&format!("📧 <b>Email:</b> {}\n", escape_html(email)));
    }
    msg.push_str(&format!(
        "💈 <b>Dịch vụ:</b> {}\n📅 <b>Ngày:</b> {}\n🕐 <b>Giờ:</b> {}\n",
        escape_html(&booking.service),
        escape_html(display_date),
        escape_html(&booking.time),
    ));
    if let Some(note) = booking.note.as_deref().filter(|n| !n.is_empty()) {
        msg.push_str(&format!("📝 <b>Ghi chú:</b> {}\n", escape_html(note)));
    }
    msg.push_str(&format!(
        "\n{}\n⏰ <i>Nhận lúc: {}</i>\n📱 <i>Nguồn: {}</i>",
        RULE, received_at, booking.source
    ));
    msg
}

/// Line appended to an alert when its status changes.
pub fn status_line(status: BookingStatus, timestamp: &str) -> String {
    let headline = match status {
        BookingStatus::Pending => "⏳ CHỜ XÁC NHẬN",
        BookingStatus::Confirmed => "✅ ĐÃ XÁC NHẬN",
        BookingStatus::Completed => "✅ ĐÃ HOÀN THÀNH",
        BookingStatus::Rejected => "❌ ĐÃ TỪ CHỐI",
    };
    format!("{} - {}", headline, timestamp)
}

/// Alert text with a status line appended.
pub fn with_status_line(original: &str, status: BookingStatus, timestamp: &str) -> String {
    format!(
        "{}\n\n{}",
        escape_html(original),
        status_line(status, timestamp)
    )
}

/// Bookings for one day, as listed by `/today` and `/tomorrow`.
pub fn day_listing(title: &str, date: &str, bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return format!("📅 <b>{} ({})</b>\n\nKhông có lịch hẹn.", title, date);
    }
    let mut msg = format!("📅 <b>{} ({})</b>\n{}\n\n", title, date, RULE);
    for b in bookings {
        msg.push_str(&format!(
            "🆔 {} | 🕐 {} | {} ({})\n💈 {} | {}\n\n",
            escape_html(&b.id),
            escape_html(&b.time),
            escape_html(&b.name),
            escape_html(&b.phone),
            escape_html(&b.service),
            b.status_label(),
        ));
    }
    msg.push_str(&format!("📊 Tổng: <b>{}</b>", bookings.len()));
    msg
}

/// Bookings with one status, as listed by `/all` and `/done`.
pub fn status_listing(status: BookingStatus, bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return match status {
            BookingStatus::Pending => "✅ Không có đơn chờ xác nhận!".to_string(),
            BookingStatus::Completed => "Chưa có đơn hoàn thành.".to_string(),
            other => format!("Không có đơn: {}", other),
        };
    }
    let title = match status {
        BookingStatus::Pending => "⏳ <b>Đơn chờ xác nhận</b>",
        BookingStatus::Confirmed => "✅ <b>Đơn đã xác nhận</b>",
        BookingStatus::Completed => "✅ <b>Đơn hoàn thành</b>",
        BookingStatus::Rejected => "❌ <b>Đơn đã từ chối</b>",
    };
    let mut msg = format!("{}\n{}\n\n", title, RULE);
    for b in bookings {
        msg.push_str(&format!(
            "🆔 {} | {} ({})\n📅 {} 🕐 {} | 💈 {}\n\n",
            escape_html(&b.id),
            escape_html(&b.name),
            escape_html(&b.phone),
            escape_html(&b.date),
            escape_html(&b.time),
            escape_html(&b.service),
        ));
    }
    msg.push_str(&format!("📊 Tổng: <b>{}</b>", bookings.len()));
    msg
}

/// Result of `/find`.
pub fn search_results(keyword: &str, bookings: &[Booking]) -> String {
    let keyword = escape_html(keyword);
    if bookings.is_empty() {
        return format!("🔍 Không tìm thấy: <b>{}</b>", keyword);
    }
    let mut msg = format!("🔍 <b>Kết quả: {}</b>\n{}\n\n", keyword, RULE);
    for b in bookings {
        msg.push_str(&format!(
            "🆔 {} | {} ({})\n📅 {} 🕐 {} | {}\n\n",
            escape_html(&b.id),
            escape_html(&b.name),
            escape_html(&b.phone),
            escape_html(&b.date),
            escape_html(&b.time),
            b.status_label(),
        ));
    }
    msg.trim_end().to_string()
}

/// Overview for `/stats`.
pub fn stats_message(stats: &Stats) -> String {
    format!(
        "📊 <b>THỐNG KÊ</b>\n{}\n\n\
         📋 Tổng: <b>{}</b>\n\
         📅 Hôm nay: <b>{}</b>\n\n\
         ⏳ Chờ: <b>{}</b>\n\
         ✅ Xác nhận: <b>{}</b>\n\
         ✂️ Hoàn thành: <b>{}</b>\n\
         ❌ Từ chối: <b>{}</b>",
        RULE,
        stats.total,
        stats.today,
        stats.counts.pending,
        stats.counts.confirmed,
        stats.counts.completed,
        stats.counts.rejected,
    )
}

/// End-of-day report.
pub fn daily_summary_message(summary: &DailySummary, sent_at: &str) -> String {
    let mut msg = format!(
        "📋 <b>BÁO CÁO CUỐI NGÀY</b>\n📅 {}\n{}\n\n\
         📊 Tổng: <b>{}</b>\n\
         ✅ Hoàn thành: <b>{}</b>\n\
         ✔️ Xác nhận: <b>{}</b>\n\
         ⏳ Chờ: <b>{}</b>\n\
         ❌ Từ chối: <b>{}</b>\n\n",
        summary.date,
        RULE,
        summary.total,
        summary.counts.completed,
        summary.counts.confirmed,
        summary.counts.pending,
        summary.counts.rejected,
    );
    for c in &summary.customers {
        msg.push_str(&format!(
            "🆔 {} | {} | 🕐 {} | {}\n",
            escape_html(&c.id),
            escape_html(&c.name),
            escape_html(&c.time),
            c.status_label(),
        ));
    }
    msg.push_str(&format!("\n{}\n⏰ {}", RULE, sent_at));
    msg
}

/// End-of-day report when there were no bookings.
pub fn empty_summary_message(date: &str) -> String {
    format!(
        "📋 <b>BÁO CÁO CUỐI NGÀY</b>\n📅 {}\n\nKhông có đơn hôm nay.",
        date
    )
}

/// Help text for `/start` and `/help`.
pub fn help_message() -> String {
    "🏠 <b>BarberShop Manager</b>\n\n\
     Bấm nút bên dưới hoặc gõ lệnh:\n\n\
     📅 <b>Hôm nay</b>: Lịch hẹn hôm nay\n\
     📅 <b>Ngày mai</b>: Lịch hẹn ngày mai\n\
     ⏳ <b>Chờ xác nhận</b>: Đơn chờ\n\
     ✅ <b>Hoàn thành</b>: Đơn xong\n\
     📊 <b>Thống kê</b>: Tổng quan\n\n\
     🔍 Tìm kiếm: /find 0901234567"
        .to_string()
}
