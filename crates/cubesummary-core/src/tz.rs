//! Timezone handling utilities.
//!
//! This module provides functions for parsing reporting timezone names and
//! converting between UTC and local time with proper DST handling.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SummaryError};

/// Upper bound when searching for the end of a DST gap.
const MAX_GAP_MINUTES: i64 = 2 * 24 * 60;

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use cubesummary_core::tz::parse_tz;
///
/// let tz = parse_tz("America/Chicago").unwrap();
/// assert_eq!(tz.to_string(), "America/Chicago");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SummaryError::InvalidTimezone(name.to_string()))
}

/// Convert a UTC datetime to local time in the specified timezone.
pub fn utc_to_local(utc: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    utc.with_timezone(&tz)
}

/// Convert a local civil datetime in a specific timezone to UTC.
///
/// Ambiguous times (DST fall back) resolve to the earlier occurrence.
/// Nonexistent times (DST spring forward) resolve to the first valid
/// instant after the gap, so a period that "starts" inside a gap starts
/// when the local clock actually resumes.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Ok(dt.with_timezone(&Utc));
    }

    // Find the first valid minute, then the first valid second before it.
    // Historical offsets are not always whole minutes.
    for minutes in 1..=MAX_GAP_MINUTES {
        let minute = local + Duration::minutes(minutes);
        if tz.from_local_datetime(&minute).earliest().is_none() {
            continue;
        }
        for seconds in (0..60).rev() {
            let candidate = minute - Duration::seconds(seconds);
            if candidate <= local {
                continue;
            }
            if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
                return Ok(dt.with_timezone(&Utc));
            }
        }
    }

    Err(SummaryError::ParseError(format!(
        "Local time {} cannot be resolved in timezone {}",
        local.format("%Y-%m-%dT%H:%M:%S"),
        tz
    )))
}

/// Convert local midnight at the start of `date` to UTC.
///
/// Period boundaries are always local midnight, so this is the conversion
/// used for every bucket edge.
pub fn local_midnight_to_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    local_to_utc(date.and_time(NaiveTime::default()), tz)
}

/// Format a datetime as RFC3339 with timezone offset.
///
/// An RFC3339 formatted string (e.g., "2010-12-30T00:00:00-06:00").
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format a UTC datetime as RFC3339 with Z suffix.
pub fn format_rfc3339_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parse_valid_timezone() {
        let tz = parse_tz("Australia/Darwin").unwrap();
        assert_eq!(tz.to_string(), "Australia/Darwin");
    }

    #[test]
    fn parse_invalid_timezone() {
        let result = parse_tz("Mars/Olympus_Mons");
        if let Err(SummaryError::InvalidTimezone(name)) = result {
            assert_eq!(name, "Mars/Olympus_Mons");
        } else {
            panic!("Expected InvalidTimezone error");
        }
    }

    #[test]
    fn utc_to_local_crosses_year_boundary() {
        let utc = Utc.with_ymd_and_hms(2010, 12, 31, 23, 33, 13).single().unwrap();
        let darwin = parse_tz("Australia/Darwin").unwrap();
        let local = utc_to_local(utc, darwin);

        assert_eq!(
            local.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2011-01-01 09:03:13"
        );
    }

    #[test]
    fn local_midnight_chicago_winter() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let date = NaiveDate::from_ymd_opt(2010, 12, 30).unwrap();
        let utc = local_midnight_to_utc(date, chicago).unwrap();

        assert_eq!(format_rfc3339_utc(&utc), "2010-12-30T06:00:00Z");
    }

    #[test]
    fn ambiguous_local_time_uses_earliest() {
        // Berlin falls back at 03:00 CEST on 2026-10-25; 02:30 happens twice.
        let berlin = parse_tz("Europe/Berlin").unwrap();
        let utc = local_to_utc(local(2026, 10, 25, 2, 30), berlin).unwrap();

        assert_eq!(format_rfc3339_utc(&utc), "2026-10-25T00:30:00Z");
    }

    #[test]
    fn nonexistent_local_time_shifts_to_gap_end() {
        // Berlin springs forward at 02:00 on 2026-03-29; 02:30 never happens.
        let berlin = parse_tz("Europe/Berlin").unwrap();
        let utc = local_to_utc(local(2026, 3, 29, 2, 30), berlin).unwrap();

        assert_eq!(format_rfc3339_utc(&utc), "2026-03-29T01:00:00Z");
    }

    #[test]
    fn nonexistent_local_midnight() {
        // Chile starts DST at midnight; 2022-09-11 00:00 does not exist.
        let santiago = parse_tz("America/Santiago").unwrap();
        let date = NaiveDate::from_ymd_opt(2022, 9, 11).unwrap();
        let utc = local_midnight_to_utc(date, santiago).unwrap();

        assert_eq!(format_rfc3339_utc(&utc), "2022-09-11T04:00:00Z");
    }

    #[test]
    fn skipped_calendar_day() {
        // Samoa skipped 2011-12-30 entirely, jumping from -10:00 to +14:00.
        let apia = parse_tz("Pacific/Apia").unwrap();
        let utc = local_to_utc(local(2011, 12, 30, 12, 0), apia).unwrap();

        assert_eq!(format_rfc3339_utc(&utc), "2011-12-30T10:00:00Z");
        assert_eq!(
            format_rfc3339(&utc.with_timezone(&apia)),
            "2011-12-31T00:00:00+14:00"
        );
    }

    #[test]
    fn format_rfc3339_with_offset() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let dt = chicago.with_ymd_and_hms(2010, 12, 30, 0, 0, 0).single().unwrap();

        assert_eq!(format_rfc3339(&dt), "2010-12-30T00:00:00-06:00");
    }
}
