use chrono::{NaiveDate, NaiveTime};

/// Formats the robust parser tries, in order. First success wins, so an
/// input like "01-02-2025" always reads as day-month-year even though
/// other interpretations exist. Client input format is not guaranteed,
/// which is why booking accepts all of these.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Try each known calendar-date format and accept the first that parses.
/// Returns `None` for blank input or when no format matches; callers
/// decide whether that is an error (appointment date) or a skipped
/// optional field (profile dob).
pub fn parse_date_robustly(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Appointment times accept exactly one canonical shape: `HH:MM`.
pub fn parse_time_strict(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}
