//! Message timestamp labels.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Short label for a message timestamp.
///
/// `HH:MM` if the message was written on the same calendar day as `today`,
/// `Mon DD` otherwise. Both are rendered in `today`'s time zone.
pub fn format_timestamp<Tz>(written_at: DateTime<Utc>, today: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = written_at.with_timezone(&today.timezone());

    if local.date_naive() == today.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %d").to_string()
    }
}
