//! One-message booking template (`DATLICH` followed by `Key: value` lines).

use sheet_store::{BookingSource, NewBooking};

use crate::services;
use crate::validation::normalize_phone;

/// Keyword that opens a template message (case-insensitive).
pub const TEMPLATE_KEYWORD: &str = "datlich";

/// Filled-in example shown to customers.
pub const TEMPLATE_EXAMPLE: &str = "DATLICH\n\
     Họ tên: Nguyễn Văn A\n\
     SĐT: 0901234567\n\
     Dịch vụ: Combo VIP\n\
     Ngày: 20/02/2026\n\
     Giờ: 14:00\n\
     Ghi chú: Cắt kiểu Undercut";

/// Reply when the template lacks a name or phone.
pub const MISSING_CONTACT_HINT: &str =
    "⚠️ Thiếu thông tin! Vui lòng nhập đầy đủ Họ tên và SĐT.\n\nGõ 'đặt lịch' để xem hướng dẫn.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Phone,
    Email,
    Service,
    Date,
    Time,
    Note,
}

const KEYS: [(&str, Field); 23] = [
    ("họ tên", Field::Name),
    ("ho ten", Field::Name),
    ("tên", Field::Name),
    ("ten", Field::Name),
    ("name", Field::Name),
    ("sđt", Field::Phone),
    ("sdt", Field::Phone),
    ("số", Field::Phone),
    ("so", Field::Phone),
    ("phone", Field::Phone),
    ("email", Field::Email),
    ("dịch vụ", Field::Service),
    ("dich vu", Field::Service),
    ("service", Field::Service),
    ("ngày", Field::Date),
    ("ngay", Field::Date),
    ("date", Field::Date),
    ("giờ", Field::Time),
    ("gio", Field::Time),
    ("time", Field::Time),
    ("ghi chú", Field::Note),
    ("ghi chu", Field::Note),
    ("note", Field::Note),
];

fn field_for(key: &str) -> Option<Field> {
    KEYS.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, field)| *field)
}

/// Whether a message is a booking template.
pub fn is_template(text: &str) -> bool {
    text.trim_start().to_lowercase().starts_with(TEMPLATE_KEYWORD)
}

/// Template without a customer name or phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingContact;

/// Build a booking from a template message.
///
/// The name defaults to the sender's display name. Services are matched
/// against the menu; phones are normalized when they are valid and kept as
/// written otherwise.
pub fn parse_template(
    text: &str,
    sender_name: &str,
    source: BookingSource,
) -> Result<NewBooking, MissingContact> {
    let mut booking = NewBooking {
        fullname: sender_name.trim().to_string(),
        source,
        ..Default::default()
    };

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let Some(field) = field_for(&key.trim().to_lowercase()) else {
            continue;
        };
        let optional = (!value.is_empty()).then(|| value.to_string());
        match field {
            Field::Name => booking.fullname = value.to_string(),
            Field::Phone => {
                booking.phone = normalize_phone(value).unwrap_or_else(|| value.to_string())
            }
            Field::Email => booking.email = optional,
            Field::Service => booking.service = services::resolve_label(value),
            Field::Date => booking.date = value.to_string(),
            Field::Time => booking.time = value.to_string(),
            Field::Note => booking.note = optional,
        }
    }

    if booking.fullname.is_empty() || booking.phone.is_empty() {
        return Err(MissingContact);
    }
    Ok(booking)
}
