//! `datetime-local` timestamps.
//!
//! Inputs of type `datetime-local` produce `YYYY-MM-DDTHH:MM`; the API may
//! answer with seconds, fractional seconds, a space separator or an RFC 3339
//! offset. Everything is normalized to a naive local timestamp and written
//! back in the short input form whenever no precision is lost.

use chrono::{DateTime, NaiveDateTime, Timelike};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    INPUT_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse any timestamp shape the form or the API produces.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

/// Format for a `datetime-local` input.
pub fn format(value: &NaiveDateTime) -> String {
    if value.second() == 0 && value.nanosecond() == 0 {
        value.format(INPUT_FORMAT).to_string()
    } else {
        value.format(SECONDS_FORMAT).to_string()
    }
}

/// Serde adapter for `Option<NaiveDateTime>` fields. Empty strings read as
/// `None`, the way a cleared input submits.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }
}
