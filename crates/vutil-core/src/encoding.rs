//! RFC 3339 aware JSON encoding
//!
//! Date-time values are rendered as RFC 3339 text with their own UTC offset,
//! whole seconds and a numeric offset (`2023-06-01T12:34:56+00:00`). All other
//! values follow `serde_json`'s rules, and values `serde_json` cannot
//! represent fail with its own `Error` (category `Data`).
//!
//! Date-times reach the encoder only in one of two ways:
//! - a field annotated with `#[serde(with = "vutil_core::encoding::rfc3339")]`
//! - a [`Timestamp`] wrapper placed in an ad-hoc document
//!
//! chrono is built without its `serde` feature, so a bare `DateTime` is not
//! `Serialize` and cannot slip through in chrono's own `Z` format:
//!
//! ```rust,compile_fail
//! use chrono::{TimeZone, Utc};
//! use vutil_core::encoding::TemporalEncoder;
//!
//! let at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 34, 56).unwrap();
//! TemporalEncoder::new().encode(&at).unwrap();
//! ```
//!
//! Naive date-times are read as local wall-clock time and get the local
//! offset in effect at that moment.
//!
//! # Example
//!
//! ```rust
//! use chrono::{DateTime, TimeZone, Utc};
//! use serde::Serialize;
//! use vutil_core::encoding::{rfc3339, TemporalEncoder};
//!
//! #[derive(Serialize)]
//! struct Advisory {
//!     id: String,
//!     #[serde(with = "rfc3339")]
//!     published: DateTime<Utc>,
//! }
//!
//! let advisory = Advisory {
//!     id: "CVE-2023-0001".to_string(),
//!     published: Utc.with_ymd_and_hms(2023, 6, 1, 12, 34, 56).unwrap(),
//! };
//!
//! let json = TemporalEncoder::new().encode(&advisory).unwrap();
//! assert_eq!(json, r#"{"id":"CVE-2023-0001","published":"2023-06-01T12:34:56+00:00"}"#);
//! ```

use std::fmt::Display;
use std::io;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A calendar date-time that can render itself as RFC 3339 text
pub trait Rfc3339 {
    /// Render with whole seconds and a numeric UTC offset
    fn to_rfc3339_string(&self) -> String;
}

impl<Tz> Rfc3339 for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn to_rfc3339_string(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

impl Rfc3339 for NaiveDateTime {
    fn to_rfc3339_string(&self) -> String {
        // Skipped wall-clock times (DST gap) take the offset of the same UTC instant
        let offset = Local
            .offset_from_local_datetime(self)
            .earliest()
            .unwrap_or_else(|| Local.offset_from_utc_datetime(self));
        format!("{}{}", self.format("%Y-%m-%dT%H:%M:%S"), offset)
    }
}

impl<T: Rfc3339 + ?Sized> Rfc3339 for &T {
    fn to_rfc3339_string(&self) -> String {
        (**self).to_rfc3339_string()
    }
}

/// Serializes the wrapped date-time as an RFC 3339 string
///
/// Useful for documents built on the fly:
///
/// ```rust
/// use chrono::{FixedOffset, TimeZone};
/// use vutil_core::encoding::Timestamp;
///
/// let tz = FixedOffset::east_opt(2 * 3600).unwrap();
/// let at = tz.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
///
/// let doc = serde_json::json!({ "fetched_at": Timestamp(at) });
/// assert_eq!(doc["fetched_at"], "2024-01-15T08:00:00+02:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp<T>(pub T);

impl<T: Rfc3339> Serialize for Timestamp<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_string())
    }
}

/// Serde `with` hook for date-time fields
///
/// Serializes any [`Rfc3339`] value; deserializes any RFC 3339 string into a
/// type convertible from `DateTime<FixedOffset>` (`DateTime<Utc>`,
/// `DateTime<Local>` or `DateTime<FixedOffset>` itself).
pub mod rfc3339 {
    use super::{Rfc3339, Timestamp};
    use chrono::{DateTime, FixedOffset};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Rfc3339,
        S: Serializer,
    {
        Timestamp(value).serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: From<DateTime<FixedOffset>>,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(T::from)
            .map_err(|e| D::Error::custom(format!("invalid RFC 3339 date-time {:?}: {}", text, e)))
    }

    /// The same hook for `Option` fields; `None` maps to `null`
    pub mod option {
        use super::super::{Rfc3339, Timestamp};
        use chrono::{DateTime, FixedOffset};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Rfc3339,
            S: Serializer,
        {
            value.as_ref().map(Timestamp).serialize(serializer)
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: From<DateTime<FixedOffset>>,
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|text| {
                    DateTime::parse_from_rfc3339(&text).map(T::from).map_err(|e| {
                        D::Error::custom(format!("invalid RFC 3339 date-time {:?}: {}", text, e))
                    })
                })
                .transpose()
        }
    }
}

/// JSON encoder with RFC 3339 date-time rendering
///
/// Thin over `serde_json`: errors are `serde_json::Error` as produced by the
/// base serializer, never wrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalEncoder {
    pretty: bool,
}

impl TemporalEncoder {
    /// Create a compact encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between compact and indented output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Encode `value` to a JSON string
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    /// Encode `value` as JSON into `writer`
    pub fn encode_to_writer<W, T>(&self, writer: W, value: &T) -> serde_json::Result<()>
    where
        W: io::Write,
        T: Serialize + ?Sized,
    {
        if self.pretty {
            serde_json::to_writer_pretty(writer, value)
        } else {
            serde_json::to_writer(writer, value)
        }
    }

    /// Encode `value` to an in-memory JSON tree
    pub fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Value> {
        serde_json::to_value(value)
    }

    /// Encode a bare date-time as a JSON string literal
    pub fn encode_datetime<T: Rfc3339>(&self, value: &T) -> serde_json::Result<String> {
        self.encode(&Timestamp(value))
    }
}

/// Parse RFC 3339 text back into a date-time with its original offset
pub fn parse_rfc3339(text: &str) -> chrono::ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
}
