//! Time-range parameters: absolute, relative and keyword ranges.
//!
//! The three representations are mutually exclusive in the query string.
//! [`TimeRange::apply`] is the only place that writes them, and it always
//! clears every competing key before setting its own.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Timelike, Utc};

use super::params::{SearchParams, FROM, KEYWORD, RANGE_TYPE, RELATIVE, TO};
use crate::error::SearchError;

const RANGE_ABSOLUTE: &str = "absolute";
const RANGE_RELATIVE: &str = "relative";
const RANGE_KEYWORD: &str = "keyword";

/// ISO-8601 date-times with an offset that RFC 3339 does not cover: basic
/// (`+0000`) and hour-only (`+00`) offsets, minute precision.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%#z",
];

/// Offset-less ISO-8601 date-time forms, taken as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Time filter active on a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRange {
    /// Fixed window; both ends already truncated to milliseconds.
    Absolute {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Window ending now, `seconds` long.
    Relative { seconds: u64 },
    /// Natural-language expression interpreted by the search service.
    Keyword(String),
}

impl TimeRange {
    /// Absolute range with both ends normalized to millisecond precision.
    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        TimeRange::Absolute {
            from: truncate_to_millis(from),
            to: truncate_to_millis(to),
        }
    }

    /// Writes this range into `params`, removing any other range representation.
    pub fn apply(&self, params: &mut SearchParams) {
        for key in [FROM, TO, RELATIVE, KEYWORD] {
            params.remove(key);
        }
        match self {
            TimeRange::Absolute { from, to } => {
                params.set(RANGE_TYPE, RANGE_ABSOLUTE);
                params.set(FROM, format_timestamp(from));
                params.set(TO, format_timestamp(to));
            }
            TimeRange::Relative { seconds } => {
                params.set(RANGE_TYPE, RANGE_RELATIVE);
                params.set(RELATIVE, seconds.to_string());
            }
            TimeRange::Keyword(expression) => {
                params.set(RANGE_TYPE, RANGE_KEYWORD);
                params.set(KEYWORD, expression.as_str());
            }
        }
    }

    /// Reads the active range back out of `params`.
    ///
    /// Returns `None` when no range is set or the stored values are not in the
    /// form [`apply`](Self::apply) writes.
    pub fn from_params(params: &SearchParams) -> Option<Self> {
        match params.get(RANGE_TYPE)? {
            RANGE_ABSOLUTE => {
                let from = params.get(FROM)?.into_timestamp().ok()?;
                let to = params.get(TO)?.into_timestamp().ok()?;
                Some(TimeRange::absolute(from, to))
            }
            RANGE_RELATIVE => {
                let seconds = params.get(RELATIVE)?.parse().ok()?;
                Some(TimeRange::Relative { seconds })
            }
            RANGE_KEYWORD => Some(TimeRange::Keyword(params.get(KEYWORD)?.to_string())),
            _ => None,
        }
    }
}

/// Conversion of caller-supplied instants into UTC timestamps.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError>;
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        Ok(self)
    }
}

impl IntoTimestamp for DateTime<FixedOffset> {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        Ok(self.with_timezone(&Utc))
    }
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        Ok(self.and_utc())
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        parse_timestamp(self)
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        parse_timestamp(self)
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Result<DateTime<Utc>, SearchError> {
        parse_timestamp(&self)
    }
}

/// Parses an ISO-8601 date-time. Offsets are converted to UTC; a missing
/// offset means UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, SearchError> {
    let s = input.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => return Ok(ts.with_timezone(&Utc)),
        Err(e) => e,
    };
    // `Z` spelled as an offset so the `%z` family can read it.
    let zoned = match s.strip_suffix(|c| c == 'Z' || c == 'z') {
        Some(rest) => format!("{rest}+00:00"),
        None => s.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(&zoned, format) {
            return Ok(ts.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(SearchError::invalid_timestamp(input, rfc3339_err))
}

/// Drops everything below the millisecond. Never rounds up.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond() / 1_000_000 * 1_000_000;
    ts.with_nanosecond(nanos).unwrap_or(ts)
}

/// `2020-01-01T00:00:00.000Z`: always exactly three fractional digits.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    truncate_to_millis(*ts).to_rfc3339_opts(SecondsFormat::Millis, true)
}
