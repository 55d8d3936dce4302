use chrono::{DateTime, Datelike, Utc};

pub const TRACKING_PREFIX: &str = "HCMS";

/// Format the human-facing booking reference: `HCMS-<year>-<4-digit seq>`.
///
/// The sequence rides on the store's appointment id sequence, so this must
/// be called inside the same atomic unit that assigns the id; two bookings
/// reading the same max id would otherwise mint the same reference.
pub fn mint_tracking_id(now: DateTime<Utc>, sequence: i64) -> String {
    format!("{}-{}-{:04}", TRACKING_PREFIX, now.year(), sequence)
}
