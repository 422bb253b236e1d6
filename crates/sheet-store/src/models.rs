//! Booking models and the sheet's column layout.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of columns in a booking row.
pub const COLUMN_COUNT: usize = 10;

/// Header row written to an empty sheet.
pub const HEADER: [&str; COLUMN_COUNT] = [
    "Mã",
    "Họ tên",
    "SĐT",
    "Email",
    "Dịch vụ",
    "Ngày",
    "Giờ",
    "Ghi chú",
    "Trạng thái",
    "Thời gian đặt",
];

/// Zero-based column indices of a booking row.
pub mod col {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const PHONE: usize = 2;
    pub const EMAIL: usize = 3;
    pub const SERVICE: usize = 4;
    pub const DATE: usize = 5;
    pub const TIME: usize = 6;
    pub const NOTE: usize = 7;
    pub const STATUS: usize = 8;
    pub const CREATED_AT: usize = 9;
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Rejected,
}

impl BookingStatus {
    /// All statuses in report order.
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Rejected,
    ];

    /// Text written into the status cell.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "⏳ Chờ xác nhận",
            Self::Confirmed => "✅ Đã xác nhận",
            Self::Completed => "✅ Đã hoàn thành",
            Self::Rejected => "❌ Đã từ chối",
        }
    }

    /// Classify a status cell.
    ///
    /// Matching is by keyword so cells edited by hand (missing emoji,
    /// different casing) still classify.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("chờ") {
            Some(Self::Pending)
        } else if lower.contains("hoàn thành") {
            Some(Self::Completed)
        } else if lower.contains("từ chối") {
            Some(Self::Rejected)
        } else if lower.contains("đã xác nhận") {
            Some(Self::Confirmed)
        } else {
            None
        }
    }

    /// Whether an admin may move a booking from `self` to `next`.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Rejected)
                | (Self::Confirmed, Self::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channel a booking arrived through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingSource {
    #[default]
    Website,
    Telegram,
    Zalo,
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Website => "Website",
            Self::Telegram => "Telegram",
            Self::Zalo => "Zalo",
        };
        f.write_str(name)
    }
}

/// A booking submission that has passed required-field validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub fullname: String,
    pub phone: String,
    pub service: String,
    /// ISO `yyyy-mm-dd`; other formats are stored as given.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source: BookingSource,
}

impl NewBooking {
    /// Build the sheet row for this booking.
    pub fn to_row(&self, id: &str, display_date: &str, created_at: &str) -> Vec<String> {
        vec![
            id.to_string(),
            self.fullname.clone(),
            self.phone.clone(),
            self.email.clone().unwrap_or_default(),
            self.service.clone(),
            display_date.to_string(),
            self.time.clone(),
            self.note.clone().unwrap_or_default(),
            BookingStatus::Pending.label().to_string(),
            created_at.to_string(),
        ]
    }
}

/// Result of a successful `add_booking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedBooking {
    /// Generated booking ID (e.g. `DUC03`).
    pub id: String,
    /// Date in display format.
    pub date: String,
}

/// A booking row read back from the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub note: String,
    /// `None` when the status cell holds unrecognised text.
    pub status: Option<BookingStatus>,
    pub created_at: String,
}

impl Booking {
    /// Parse a sheet row; short rows yield empty fields.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        Self {
            id: cell(col::ID),
            name: cell(col::NAME),
            phone: cell(col::PHONE),
            email: cell(col::EMAIL),
            service: cell(col::SERVICE),
            date: cell(col::DATE),
            time: cell(col::TIME),
            note: cell(col::NOTE),
            status: BookingStatus::from_label(&cell(col::STATUS)),
            created_at: cell(col::CREATED_AT),
        }
    }

    /// Status label for display.
    pub fn status_label(&self) -> &'static str {
        self.status.map(|s| s.label()).unwrap_or("?")
    }
}

/// Per-status booking counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl StatusCounts {
    /// Count statuses of the given bookings.
    pub fn tally<'a>(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        let mut counts = Self::default();
        for booking in bookings {
            match booking.status {
                Some(BookingStatus::Pending) => counts.pending += 1,
                Some(BookingStatus::Confirmed) => counts.confirmed += 1,
                Some(BookingStatus::Completed) => counts.completed += 1,
                Some(BookingStatus::Rejected) => counts.rejected += 1,
                None => {}
            }
        }
        counts
    }

    /// Count for one status.
    pub fn get(&self, status: BookingStatus) -> usize {
        match status {
            BookingStatus::Pending => self.pending,
            BookingStatus::Confirmed => self.confirmed,
            BookingStatus::Completed => self.completed,
            BookingStatus::Rejected => self.rejected,
        }
    }
}

/// Overview returned by `get_stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    /// Bookings whose appointment date is today.
    pub today: usize,
    pub counts: StatusCounts,
}

/// Closing report produced before the daily rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Report date in display format.
    pub date: String,
    pub total: usize,
    pub counts: StatusCounts,
    pub customers: Vec<Booking>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_roundtrip() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::from_label(status.label()), Some(status));
        }
    }

    #[test]
    fn test_status_from_hand_edited_label() {
        assert_eq!(
            BookingStatus::from_label("chờ xác nhận"),
            Some(BookingStatus::Pending)
        );
        assert_eq!(
            BookingStatus::from_label("Đã Hoàn Thành"),
            Some(BookingStatus::Completed)
        );
        assert_eq!(BookingStatus::from_label("đã từ chối"), Some(BookingStatus::Rejected));
        assert_eq!(BookingStatus::from_label(""), None);
        assert_eq!(BookingStatus::from_label("xác nhận"), None);
    }

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Confirmed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Confirmed));
    }

    #[test]
    fn test_booking_from_short_row() {
        let row = vec!["DUC01".to_string(), "An".to_string()];
        let booking = Booking::from_row(&row);
        assert_eq!(booking.id, "DUC01");
        assert_eq!(booking.name, "An");
        assert_eq!(booking.phone, "");
        assert_eq!(booking.status, None);
        assert_eq!(booking.status_label(), "?");
    }

    #[test]
    fn test_new_booking_row_layout() {
        let booking = NewBooking {
            fullname: "Nguyễn Văn A".to_string(),
            phone: "0901234567".to_string(),
            service: "Combo VIP - 350K".to_string(),
            date: "2026-02-20".to_string(),
            time: "14:00".to_string(),
            email: None,
            note: Some("Undercut".to_string()),
            source: BookingSource::Website,
        };
        let row = booking.to_row("DUC01", "20/02/2026", "09:15 19/02/2026");
        assert_eq!(row.len(), COLUMN_COUNT);
        assert_eq!(row[col::EMAIL], "");
        assert_eq!(row[col::DATE], "20/02/2026");
        assert_eq!(row[col::NOTE], "Undercut");
        assert_eq!(row[col::STATUS], BookingStatus::Pending.label());
        assert_eq!(row[col::CREATED_AT], "09:15 19/02/2026");
    }
}
