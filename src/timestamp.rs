//! Textual timestamp format used at the serialization boundary.
//!
//! Response and request timestamps use `yyyy-MM-dd HH:mm:ss` in UTC with no
//! zone suffix.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `chrono` format string for boundary timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp in the boundary format.
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a boundary-format timestamp as UTC.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when the text does not match
/// `yyyy-MM-dd HH:mm:ss`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Serde adapter for required boundary timestamps.
pub mod serde_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes a timestamp in the boundary format.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*value))
    }

    /// Deserializes a boundary-format timestamp.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when the text is malformed.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional boundary timestamps.
pub mod serde_optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes an optional timestamp, writing `null` when absent.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => serializer.serialize_str(&super::format_timestamp(*timestamp)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional boundary-format timestamp.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when present text is malformed.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|text| super::parse_timestamp(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
