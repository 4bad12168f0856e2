//! Permissive ISO-8601 parsing for client-supplied announcement dates.
//!
//! Browsers and mobile clients send a mix of `...Z`, `...+02:00`, minute
//! precision (`<input type="datetime-local">`) and millisecond values.
//! Each accepted shape is a [`ParseStrategy`], tried in [`ParseStrategy::ORDER`].

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // chrono's format parser accepts unpadded fields and stray whitespace, so
    // the ISO shape is checked before handing the value to it.
    static ref ISO_SHAPE: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}:\d{2}(\.\d+)?([+-]\d{2}:\d{2})?)?$"
    )
    .unwrap();
    static ref NO_SECONDS: Regex =
        Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ](\d{2}:\d{2})([+-]\d{2}:\d{2})?$").unwrap();
    static ref FRACTIONAL_SECONDS: Regex =
        Regex::new(r"^(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2})\.\d+(.*)$").unwrap();
}

const AWARE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid ISO datetime: {0}")]
pub struct ParseError(pub String);

/// A parsed point in time, with or without an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl ParsedTimestamp {
    /// Normalize to a UTC instant.
    ///
    /// Naive values are read on the server's local clock. A local time that
    /// falls in a DST gap has no local instant and is taken as UTC; an
    /// ambiguous one resolves to the earlier instant.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            ParsedTimestamp::Aware(dt) => dt.with_timezone(&Utc),
            ParsedTimestamp::Naive(naive) => match Local.from_local_datetime(naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(naive),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// `YYYY-MM-DD[T ]HH:MM:SS[.f][±HH:MM]` or a bare date.
    StrictIso,
    /// `YYYY-MM-DD[T ]HH:MM[±HH:MM]`, seconds defaulted to `:00`.
    NoSeconds,
    /// Fractional seconds of any length dropped before a strict parse.
    FractionalStripped,
}

impl ParseStrategy {
    pub const ORDER: [ParseStrategy; 3] = [
        ParseStrategy::StrictIso,
        ParseStrategy::NoSeconds,
        ParseStrategy::FractionalStripped,
    ];

    /// Apply this strategy to an already normalized value (trimmed, `Z`
    /// replaced by `+00:00`).
    pub fn apply(self, value: &str) -> Option<ParsedTimestamp> {
        match self {
            ParseStrategy::StrictIso => parse_strict(value),
            ParseStrategy::NoSeconds => {
                let caps = NO_SECONDS.captures(value)?;
                let offset = caps.get(3).map_or("", |m| m.as_str());
                parse_strict(&format!("{}T{}:00{}", &caps[1], &caps[2], offset))
            }
            ParseStrategy::FractionalStripped => {
                let caps = FRACTIONAL_SECONDS.captures(value)?;
                parse_strict(&format!("{}{}", &caps[1], &caps[2]))
            }
        }
    }
}

fn parse_strict(value: &str) -> Option<ParsedTimestamp> {
    if !ISO_SHAPE.is_match(value) {
        return None;
    }
    if let Some(dt) = AWARE_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(ParsedTimestamp::Aware(dt));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(ParsedTimestamp::Naive(naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| ParsedTimestamp::Naive(date.and_time(NaiveTime::MIN)))
}

/// Parse a client-supplied ISO-8601 string. The first strategy that matches
/// wins; the error carries the original input.
pub fn parse_iso_datetime(value: &str) -> Result<ParsedTimestamp, ParseError> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    ParseStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(&normalized))
        .ok_or_else(|| ParseError(value.to_string()))
}

/// Parse and normalize in one step.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_iso_datetime(value).map(|parsed| parsed.to_utc())
}
