//! Calendar-day helpers
//!
//! Dates cross every boundary of the crate as `YYYY-MM-DD` strings with no
//! time-of-day and no timezone. Comparisons are always date-only.

use chrono::NaiveDate;

/// Wire format for calendar days
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored calendar day.
///
/// Empty (or whitespace-only) strings mean "never set" and yield `Ok(None)`,
/// matching how unreviewed cards are stored.
pub fn parse_day(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT).map(Some)
}

/// Format a calendar day for storage
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
