//! Clock-time parsing, normalization and duration arithmetic.
//!
//! Batch start and end times are wall-clock strings chosen by the operator in
//! 12-hour form (`"9:00 AM"`), but stores hand them back in whatever shape
//! their schema uses, often 24-hour (`"09:00:00"`). Everything that displays,
//! searches, sorts or computes with these values goes through this module so
//! that both shapes end up in one canonical form: `"HH:MM AM/PM"`.
//!
//! None of these functions fail. Input that cannot be recognized produces an
//! empty string (or `"N/A"` for display), so a malformed row can still be
//! rendered and searched.
//!
//! ## Examples
//!
//! ```rust
//! use taktline::libs::clock::{normalize_time_format, to_24_hour_format, duration_seconds};
//!
//! assert_eq!(normalize_time_format("9:05 AM"), "09:05 AM");
//! assert_eq!(normalize_time_format("13:30:00"), "01:30 PM");
//! assert_eq!(to_24_hour_format("1:15 PM"), "13:15");
//! assert_eq!(duration_seconds(Some("9:00 AM"), Some("11:00 AM")), Some(7200));
//! ```

use chrono::{NaiveDate, NaiveTime};

/// Canonical display form of a clock time.
const CANONICAL_FORMAT: &str = "%I:%M %p";
/// 24-hour form without seconds.
const TWENTY_FOUR_HOUR_FORMAT: &str = "%H:%M";

/// Sentinel shown in the grid for missing or unreadable times.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shortest batch the update form accepts, in minutes.
pub const MIN_BATCH_MINUTES: i64 = 15;

/// First and last slots offered by the time pickers (6:00 AM .. 9:45 PM).
const FIRST_SLOT_HOUR: u32 = 6;
const LAST_SLOT_HOUR: u32 = 21;
const SLOT_MINUTES: u32 = 15;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Parses either `"H:MM AM/PM"` or `"HH:MM[:SS]"`.
pub fn parse_clock_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }

    let upper = time.to_uppercase();
    if upper.ends_with("AM") || upper.ends_with("PM") {
        // %I accepts a one-digit hour, so "9:00 AM" and "09:00 AM" both parse
        return NaiveTime::parse_from_str(&upper, CANONICAL_FORMAT).ok();
    }

    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, TWENTY_FOUR_HOUR_FORMAT))
        .ok()
}

/// Converts a 12-hour or 24-hour clock string to `"HH:MM AM/PM"`.
///
/// Returns an empty string for unrecognized input.
pub fn normalize_time_format(time: &str) -> String {
    parse_clock_time(time)
        .map(|parsed| parsed.format(CANONICAL_FORMAT).to_string())
        .unwrap_or_default()
}

/// Grid representation of an optional time: canonical form or `"N/A"`.
pub fn display_time(time: Option<&str>) -> String {
    match time.map(normalize_time_format) {
        Some(normalized) if !normalized.is_empty() => normalized,
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Converts `"H:MM AM/PM"` to `"HH:MM"` in 24-hour form.
///
/// 12 AM becomes `00`, 12 PM stays `12`. Returns an empty string for
/// unrecognized input.
pub fn to_24_hour_format(time: &str) -> String {
    parse_clock_time(time)
        .map(|parsed| parsed.format(TWENTY_FOUR_HOUR_FORMAT).to_string())
        .unwrap_or_default()
}

/// Seconds between `start` and `end`, both taken on the same reference day.
///
/// An end before the start is treated as an overnight wrap and 24 hours are
/// added. Returns `None` when either side is missing or cannot be parsed.
pub fn duration_seconds(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_clock_time(start?)?;
    let end = parse_clock_time(end?)?;

    let reference = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let elapsed = (reference.and_time(end) - reference.and_time(start)).num_seconds();

    Some(if elapsed < 0 { elapsed + SECONDS_PER_DAY } else { elapsed })
}

/// Minutes from `start` to `end` on the same day, without overnight wrap.
///
/// Used to validate operator input where an end before the start is a
/// mistake rather than a night shift.
pub fn minutes_between(start: &str, end: &str) -> Option<i64> {
    let start = parse_clock_time(start)?;
    let end = parse_clock_time(end)?;
    Some((end - start).num_minutes())
}

/// Time slots offered to operators, in canonical form.
pub fn time_options() -> Vec<String> {
    let mut options = Vec::new();
    for hour in FIRST_SLOT_HOUR..=LAST_SLOT_HOUR {
        for minute in (0..60).step_by(SLOT_MINUTES as usize) {
            if let Some(slot) = NaiveTime::from_hms_opt(hour, minute, 0) {
                options.push(slot.format(CANONICAL_FORMAT).to_string());
            }
        }
    }
    options
}

/// Slots that end at least [`MIN_BATCH_MINUTES`] after `start`.
///
/// With no start selected every slot is offered.
pub fn end_time_options(start: &str) -> Vec<String> {
    if parse_clock_time(start).is_none() {
        return time_options();
    }

    time_options()
        .into_iter()
        .filter(|option| minutes_between(start, option).is_some_and(|minutes| minutes >= MIN_BATCH_MINUTES))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_twelve_hour_input() {
        assert_eq!(normalize_time_format("9:00 AM"), "09:00 AM");
        assert_eq!(normalize_time_format("12:45 PM"), "12:45 PM");
        assert_eq!(normalize_time_format("11:59 pm"), "11:59 PM");
    }

    #[test]
    fn normalizes_twenty_four_hour_input() {
        assert_eq!(normalize_time_format("00:15"), "12:15 AM");
        assert_eq!(normalize_time_format("13:05:30"), "01:05 PM");
        assert_eq!(normalize_time_format("09:00:00"), "09:00 AM");
    }

    #[test]
    fn unrecognized_input_yields_sentinels() {
        assert_eq!(normalize_time_format(""), "");
        assert_eq!(normalize_time_format("noon"), "");
        assert_eq!(normalize_time_format("25:00"), "");
        assert_eq!(display_time(None), NOT_AVAILABLE);
        assert_eq!(display_time(Some("garbage")), NOT_AVAILABLE);
        assert_eq!(to_24_hour_format("later"), "");
    }

    #[test]
    fn converts_meridiem_edges() {
        assert_eq!(to_24_hour_format("12:00 AM"), "00:00");
        assert_eq!(to_24_hour_format("12:00 PM"), "12:00");
        assert_eq!(to_24_hour_format("1:15 PM"), "13:15");
        assert_eq!(to_24_hour_format("9:30 AM"), "09:30");
    }

    #[test]
    fn normalization_is_stable_through_24_hour_form() {
        for slot in time_options() {
            assert_eq!(normalize_time_format(&to_24_hour_format(&slot)), normalize_time_format(&slot));
        }
        for raw in ["1:05 AM", "12:00 AM", "12:30 PM", "7:45 PM"] {
            assert_eq!(normalize_time_format(&to_24_hour_format(raw)), normalize_time_format(raw));
        }
    }

    #[test]
    fn duration_wraps_overnight() {
        assert_eq!(duration_seconds(Some("9:00 AM"), Some("11:00 AM")), Some(7200));
        assert_eq!(duration_seconds(Some("10:00 PM"), Some("2:00 AM")), Some(4 * 3600));
        assert_eq!(duration_seconds(Some("9:00 AM"), None), None);
        assert_eq!(duration_seconds(Some("9:00 AM"), Some("??")), None);
    }

    #[test]
    fn time_options_cover_the_shift() {
        let options = time_options();
        assert_eq!(options.first().map(String::as_str), Some("06:00 AM"));
        assert_eq!(options.last().map(String::as_str), Some("09:45 PM"));
        assert_eq!(options.len(), 16 * 4);
    }

    #[test]
    fn end_options_respect_minimum_batch_length() {
        let options = end_time_options("9:00 AM");
        assert_eq!(options.first().map(String::as_str), Some("09:15 AM"));
        assert!(!options.iter().any(|option| option == "09:00 AM"));
        assert_eq!(end_time_options("").len(), time_options().len());
    }
}
