//! Date handling for forecast validity filtering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FloodError, FloodResult};

/// An inclusive calendar-date range. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range, rejecting a start date after the end date.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> FloodResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(FloodError::InvalidRange(format!(
                    "start_date ({}) is after end_date ({})",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Both bounds inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Normalize a timestamp-like string to its calendar date.
///
/// Supports:
/// - Date only: "2023-11-07"
/// - RFC 3339: "2023-11-07T00:00:00Z", "2023-11-07T00:00:00+02:00"
/// - Naive datetime: "2023-11-07T00:00:00", "2023-11-07 00:00:00.000"
pub fn date_from_timestamp_str(s: &str) -> Result<NaiveDate, TimeParseError> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ndt.date());
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Normalize epoch milliseconds (UTC) to a calendar date.
pub fn date_from_epoch_millis(millis: i64) -> Result<NaiveDate, TimeParseError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or(TimeParseError::OutOfRange(millis))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    #[error("Timestamp out of range: {0}")]
    OutOfRange(i64),
}
