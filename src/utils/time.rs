
use chrono::{DateTime, NaiveDate, Utc};


/// This is the standard way of converting a date to a string in tabtally. The same string keys
/// days inside the activity log.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whole seconds between `start` and `end`, rounded half up. A clock stepping backwards yields 0.
pub fn rounded_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let millis = (end - start).num_milliseconds().max(0) as u64;
    (millis + 500) / 1000
}
