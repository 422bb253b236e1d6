//! Shop-local time.
//!
//! The shop runs on a single fixed UTC offset, so "today" and every stored
//! timestamp are computed against that offset rather than the host timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Date format shown to customers and stored in the date column.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format accepted from the website form.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format of the created-at column.
pub const TIMESTAMP_FORMAT: &str = "%H:%M %d/%m/%Y";

/// Default shop offset (Vietnam, UTC+7).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

/// Wall clock pinned to the shop's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopClock {
    offset: FixedOffset,
}

impl ShopClock {
    /// Create a clock for the given offset.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Create a clock from a whole-hour offset east of UTC.
    ///
    /// Returns `None` when the offset is out of range.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Self::new)
    }

    /// The configured offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Current shop-local time.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Current shop-local date.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Today's date in display format.
    pub fn today_display(&self) -> String {
        display_date(self.today())
    }

    /// Current time in created-at format.
    pub fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

impl Default for ShopClock {
    fn default() -> Self {
        let offset =
            FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix());
        Self::new(offset)
    }
}

/// Format a date for display (`dd/mm/yyyy`).
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Convert an ISO `yyyy-mm-dd` date to display format.
///
/// Anything that is not an ISO date is returned trimmed but otherwise
/// unchanged, so already-formatted dates pass straight through.
pub fn to_display_date(raw: &str) -> String {
    let raw = raw.trim();
    match NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
        Ok(date) => display_date(date),
        Err(_) => raw.to_string(),
    }
}
