//! Display formatting for batch grid cells and metric values.
//!
//! The grid, the search index and the filters all need the same text for a
//! value, so that what an operator reads on screen is exactly what they can
//! search and filter for. These helpers are that single source.
//!
//! ## Format Specifications
//!
//! - Durations: `"HH:MM"`, negative values shown as `"00:00"`
//! - Creation timestamps: `"MM/DD/YYYY, HH:MM:SS AM/PM"`
//! - Delta ratio: percentage with one decimal (`0.909` → `"90.9%"`)
//! - Takt values: seconds with one decimal (`"132.0 s"`)
//!
//! ## Examples
//!
//! ```rust
//! use taktline::libs::formatter::{format_duration, format_ratio};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
//! assert_eq!(format_ratio(0.909), "90.9%");
//! ```

use chrono::{Duration, NaiveDateTime};

/// Format used for creation timestamps in the grid.
pub const CREATED_AT_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Formats a chrono::Duration into a standardized "HH:MM" string.
///
/// Seconds are dropped and negative durations are clamped to `"00:00"`.
///
/// ```rust
/// use taktline::libs::formatter::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(&Duration::hours(8)), "08:00");
/// assert_eq!(format_duration(&Duration::hours(-1)), "00:00");
/// ```
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Formats a whole number of seconds as "HH:MM".
pub fn format_seconds(seconds: i64) -> String {
    format_duration(&Duration::seconds(seconds))
}

/// Grid text for a creation timestamp.
pub fn format_created_at(created_at: &NaiveDateTime) -> String {
    created_at.format(CREATED_AT_FORMAT).to_string()
}

/// Delta ratio as a percentage.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Takt values in seconds.
pub fn format_takt(seconds: f64) -> String {
    format!("{:.1} s", seconds)
}

/// Signed unit delta, e.g. `+3` or `-5`.
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}
