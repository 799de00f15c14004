//! Conversion of date and datetime values to and from their stored string form.
//!
//! Documents have no native temporal type, so every date or datetime that
//! crosses the storage boundary goes through [`encode`] and [`decode`].
//! Both formats are fixed width for years 0 through 9999, which keeps
//! lexicographic order equal to chronological order when the store sorts on
//! the encoded string. Years outside that range still round-trip but carry
//! a sign and extra digits.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const LEGACY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Which temporal shape a stored string was expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    DateTime,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalKind::Date => f.write_str("date"),
            TemporalKind::DateTime => f.write_str("datetime"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed {kind} value {input:?}")]
pub struct FormatError {
    pub kind: TemporalKind,
    pub input: String,
}

impl FormatError {
    fn new(kind: TemporalKind, input: &str) -> Self {
        Self {
            kind,
            input: input.to_owned(),
        }
    }
}

/// A value with a lossless ISO-8601 string representation.
pub trait Temporal: Sized {
    const KIND: TemporalKind;

    fn encode(&self) -> String;
    fn decode(raw: &str) -> Result<Self, FormatError>;
}

impl Temporal for NaiveDate {
    const KIND: TemporalKind = TemporalKind::Date;

    fn encode(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn decode(raw: &str) -> Result<Self, FormatError> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Ok(date);
        }
        // Older records stored a full datetime where only the date mattered.
        DateTime::<Utc>::decode(raw)
            .map(|instant| instant.date_naive())
            .map_err(|_| FormatError::new(Self::KIND, raw))
    }
}

impl Temporal for DateTime<Utc> {
    const KIND: TemporalKind = TemporalKind::DateTime;

    fn encode(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn decode(raw: &str) -> Result<Self, FormatError> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(instant.with_timezone(&Utc));
        }
        // RFC 3339 only allows four-digit years; signed extended years land here.
        if let Ok(instant) = raw.parse::<DateTime<Utc>>() {
            return Ok(instant);
        }
        // Offset-less values are UTC.
        NaiveDateTime::parse_from_str(raw, LEGACY_DATETIME_FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|_| FormatError::new(Self::KIND, raw))
    }
}

pub fn encode<T: Temporal>(value: &T) -> String {
    value.encode()
}

pub fn decode<T: Temporal>(raw: &str) -> Result<T, FormatError> {
    T::decode(raw)
}

/// Decode an optional stored field; absence stays absent.
pub fn decode_opt<T: Temporal>(raw: Option<&str>) -> Result<Option<T>, FormatError> {
    raw.map(decode).transpose()
}
