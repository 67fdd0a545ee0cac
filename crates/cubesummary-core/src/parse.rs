//! Input parsing for timestamps.
//!
//! Dataset documents carry center times either as RFC3339 strings
//! (`2010-12-31T23:33:13Z`) or as offset-less strings
//! (`2010-12-31 23:33:13.123`), which are taken to be UTC. Search bounds
//! given on the command line are local civil times in the reporting
//! timezone unless they carry their own offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SummaryError};
use crate::tz::local_to_utc;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a dataset center time into a UTC instant.
///
/// # Examples
///
/// ```
/// use cubesummary_core::parse::parse_center_time;
///
/// let a = parse_center_time("2010-12-31T23:33:13Z").unwrap();
/// let b = parse_center_time("2010-12-31 23:33:13").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_center_time(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    parse_naive(trimmed)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            SummaryError::ParseError(format!(
                "Invalid center time: '{}'. Expected RFC3339 or 'YYYY-MM-DD HH:MM:SS'",
                input
            ))
        })
}

/// Parse an offset-less local time such as `2010-12-30`, `2010-12-30 06:00`
/// or `2010-12-30T06:00:00`. A bare date means local midnight.
pub fn parse_local_datetime(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    if let Some(naive) = parse_naive(trimmed) {
        return Ok(naive);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::default()))
        .map_err(|_| {
            SummaryError::ParseError(format!(
                "Invalid local time format '{}'. Expected: YYYY-MM-DD[THH:MM[:SS]]",
                input
            ))
        })
}

/// Parse a search bound: RFC3339 input keeps its own offset, anything else
/// is read as local time in `tz`.
pub fn parse_bound(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    local_to_utc(parse_local_datetime(input)?, tz)
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}
