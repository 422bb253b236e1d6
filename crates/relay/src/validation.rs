//! Input checks for the guided booking flow.

use chrono::{Duration, NaiveDate};
use sheet_store::clock::DISPLAY_DATE_FORMAT;

/// Fixed time slots offered by menu number.
pub const TIME_SLOTS: [&str; 4] = ["09:00", "11:30", "14:00", "18:00"];

/// Minimum customer name length, in characters.
pub const MIN_NAME_CHARS: usize = 2;

/// Trimmed name if it is long enough.
pub fn validate_name(input: &str) -> Option<String> {
    let name = input.trim();
    (name.chars().count() >= MIN_NAME_CHARS).then(|| name.to_string())
}

/// Normalize a Vietnamese phone number.
///
/// Spaces, dots, dashes and parentheses are stripped; the rest must be `0`
/// or `+84` followed by 9 or 10 digits.
pub fn normalize_phone(input: &str) -> Option<String> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned
        .strip_prefix("+84")
        .or_else(|| cleaned.strip_prefix('0'))?;
    let valid = (9..=10).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    valid.then_some(cleaned)
}

/// Why a date answer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// Not `1`, `2`, or `dd/mm/yyyy`.
    Invalid,
    /// Before today.
    Past,
}

/// Parse a date answer: `1` is today, `2` is tomorrow, otherwise `dd/mm/yyyy`.
pub fn parse_date_choice(input: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = match input.trim() {
        "1" => today,
        "2" => today + Duration::days(1),
        other => NaiveDate::parse_from_str(other, DISPLAY_DATE_FORMAT)
            .map_err(|_| DateError::Invalid)?,
    };
    if date < today {
        return Err(DateError::Past);
    }
    Ok(date)
}

/// Parse a time answer: a slot number `1`..`4` or `H:MM` / `HH:MM` (24h).
///
/// Returns the time as `HH:MM`.
pub fn parse_time_choice(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some(slot) = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| TIME_SLOTS.get(i))
    {
        return Some(slot.to_string());
    }

    let (hours, minutes) = input.split_once(':')?;
    let well_formed = (1..=2).contains(&hours.len())
        && minutes.len() == 2
        && hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit());
    if !well_formed {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then(|| format!("{:02}:{:02}", hours, minutes))
}
