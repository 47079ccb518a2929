use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed interval spent on a single url. Field names are part of the on-disk format and are
/// read by other tooling, so they stay `url`, `timeSpent`, `startTime` and `endTime`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub url: String,
    /// Whole seconds between start and end.
    pub time_spent: u64,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
}

/// Entries of a single day keyed by domain.
pub type DayLog = BTreeMap<String, Vec<TimeEntry>>;

/// The whole log keyed by `YYYY-MM-DD`.
pub type ActivityLog = BTreeMap<String, DayLog>;

/// Timestamps are written like `2024-03-07T12:00:05.250Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(moment: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&moment.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|v| v.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
