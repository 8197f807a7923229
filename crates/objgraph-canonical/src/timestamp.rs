//! Opaque timestamp scalar.
//!
//! A [`Timestamp`] is never decomposed by the walker: it always becomes a
//! single VALUE event whose text is the canonical UTC form
//! `YYYY-MM-DDTHH:mm:ss.sssZ`, used identically for JSON and hash input.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::EncodingError;

/// Newtype-struct name that marks a timestamp inside a serde data stream.
///
/// [`crate::node::to_node`] recognises it and produces
/// [`crate::Scalar::Timestamp`]; every other serializer sees a plain string.
pub(crate) const TIMESTAMP_TOKEN: &str = "$objgraph::private::Timestamp";

/// UTC instant rendered with exactly millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Instant `millis` milliseconds after the Unix epoch.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Self)
    }

    /// Instant from whole seconds and nanoseconds since the Unix epoch, the
    /// layout serde uses for `std::time::SystemTime`.
    pub fn from_unix_parts(secs: i64, nanos: u32) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, nanos).map(Self)
    }

    /// Parses an RFC3339 timestamp with any offset, normalised to UTC.
    pub fn parse(text: &str) -> Result<Self, EncodingError> {
        DateTime::parse_from_rfc3339(text)
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|_| EncodingError::InvalidTimestamp(text.to_string()))
    }

    /// Canonical text form; sub-millisecond precision is truncated.
    pub fn canonical(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Underlying chrono value.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &self.canonical())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "objgraph_canonical::timestamp::canonical")]` for
/// `DateTime<Utc>` fields, so they stream as opaque timestamps.
pub mod canonical {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Timestamp;

    /// Serializes the instant as a [`Timestamp`].
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        Timestamp::from(*value).serialize(serializer)
    }

    /// Reads an RFC3339 string back into a UTC instant.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        Timestamp::deserialize(deserializer).map(|ts| *ts.as_datetime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_has_three_fraction_digits() {
        let ts = Timestamp::from_unix_millis(444).unwrap();
        assert_eq!(ts.canonical(), "1970-01-01T00:00:00.444Z");
        let whole = Timestamp::from_unix_millis(1_000).unwrap();
        assert_eq!(whole.canonical(), "1970-01-01T00:00:01.000Z");
    }

    #[test]
    fn unix_parts_match_millis() {
        assert_eq!(
            Timestamp::from_unix_parts(0, 444_000_000),
            Timestamp::from_unix_millis(444)
        );
        assert_eq!(Timestamp::from_unix_parts(0, 2_000_000_000), None);
    }

    #[test]
    fn parse_normalises_offset_and_truncates() {
        let ts = Timestamp::parse("2021-05-20T12:00:00.123456+02:00").unwrap();
        assert_eq!(ts.canonical(), "2021-05-20T10:00:00.123Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            Timestamp::parse("yesterday"),
            Err(EncodingError::InvalidTimestamp("yesterday".into()))
        );
    }

    #[test]
    fn plain_serde_json_sees_canonical_string() {
        let ts = Timestamp::from_unix_millis(444).unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"1970-01-01T00:00:00.444Z\""
        );
        let back: Timestamp = serde_json::from_str("\"1970-01-01T00:00:00.444Z\"").unwrap();
        assert_eq!(back, ts);
    }
}
