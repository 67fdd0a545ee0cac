//! Calendar periods and their UTC boundaries.
//!
//! A [`Period`] is a node in the `all > year > month > day` hierarchy used by
//! the overview pages. Boundaries are computed as local midnights in the
//! reporting timezone and converted to UTC independently, so periods that
//! contain a DST transition get their true length.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};
use crate::models::TimeRange;
use crate::tz::{local_midnight_to_utc, utc_to_local};

/// Granularity of a bounded period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
    Day,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Year => write!(f, "year"),
            Granularity::Month => write!(f, "month"),
            Granularity::Day => write!(f, "day"),
        }
    }
}

/// A calendar period in the reporting timezone.
///
/// `All` covers every dataset of a product and has no boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum Period {
    All,
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Day { year: i32, month: u32, day: u32 },
}

impl Period {
    /// Build a period from optional components, rejecting gaps in the hierarchy.
    ///
    /// ```
    /// use cubesummary_core::period::Period;
    ///
    /// assert_eq!(
    ///     Period::new(Some(2010), Some(12), None).unwrap(),
    ///     Period::Month { year: 2010, month: 12 }
    /// );
    /// assert!(Period::new(Some(2010), None, Some(31)).is_err());
    /// ```
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<Self> {
        match (year, month, day) {
            (None, None, None) => Ok(Period::All),
            (Some(year), None, None) => {
                first_of_month(year, 1)?;
                Ok(Period::Year { year })
            }
            (Some(year), Some(month), None) => {
                first_of_month(year, month)?;
                Ok(Period::Month { year, month })
            }
            (Some(year), Some(month), Some(day)) => {
                NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    SummaryError::InvalidPeriod(format!(
                        "{year:04}-{month:02}-{day:02} is not a calendar date"
                    ))
                })?;
                Ok(Period::Day { year, month, day })
            }
            (_, None, Some(day)) => Err(SummaryError::InvalidPeriod(format!(
                "day {day} given without a month"
            ))),
            (None, Some(month), _) => Err(SummaryError::InvalidPeriod(format!(
                "month {month} given without a year"
            ))),
        }
    }

    /// The period of the given granularity containing `instant` in `tz`.
    pub fn of(instant: DateTime<Utc>, tz: Tz, granularity: Granularity) -> Self {
        let date = utc_to_local(instant, tz).date_naive();
        match granularity {
            Granularity::Year => Period::Year { year: date.year() },
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Day => Period::Day {
                year: date.year(),
                month: date.month(),
                day: date.day(),
            },
        }
    }

    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Period::All => None,
            Period::Year { .. } => Some(Granularity::Year),
            Period::Month { .. } => Some(Granularity::Month),
            Period::Day { .. } => Some(Granularity::Day),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match *self {
            Period::All => None,
            Period::Year { year } | Period::Month { year, .. } | Period::Day { year, .. } => {
                Some(year)
            }
        }
    }

    /// Stable key used in timelines and text output:
    /// `all`, `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn key(&self) -> String {
        match self {
            Period::All => "all".to_string(),
            Period::Year { year } => format!("{year:04}"),
            Period::Month { year, month } => format!("{year:04}-{month:02}"),
            Period::Day { year, month, day } => format!("{year:04}-{month:02}-{day:02}"),
        }
    }

    /// The enclosing period one level up.
    pub fn parent(&self) -> Option<Period> {
        match *self {
            Period::All => None,
            Period::Year { .. } => Some(Period::All),
            Period::Month { year, .. } => Some(Period::Year { year }),
            Period::Day { year, month, .. } => Some(Period::Month { year, month }),
        }
    }

    /// Whether `other` lies inside this period (a period contains itself).
    pub fn contains(&self, other: &Period) -> bool {
        let mut current = Some(*other);
        while let Some(p) = current {
            if p == *self {
                return true;
            }
            current = p.parent();
        }
        false
    }

    /// Sub-periods one level down. `All` and days have none that can be
    /// enumerated without looking at data.
    pub fn children(&self) -> Result<Vec<Period>> {
        match *self {
            Period::All | Period::Day { .. } => Ok(Vec::new()),
            Period::Year { year } => Ok((1..=12).map(|month| Period::Month { year, month }).collect()),
            Period::Month { year, month } => {
                let (start, end) = month_bounds(year, month)?;
                Ok(start
                    .iter_days()
                    .take_while(|d| *d < end)
                    .map(|d| Period::Day {
                        year,
                        month,
                        day: d.day(),
                    })
                    .collect())
            }
        }
    }

    /// Local calendar bounds `[start, end)` of the period, or `None` for `All`.
    pub fn local_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let bounds = match *self {
            Period::All => return Ok(None),
            Period::Year { year } => (first_of_month(year, 1)?, first_of_month(year + 1, 1)?),
            Period::Month { year, month } => month_bounds(year, month)?,
            Period::Day { year, month, day } => {
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    SummaryError::InvalidPeriod(format!("{} is not a calendar date", self.key()))
                })?;
                let next = date.succ_opt().ok_or_else(|| {
                    SummaryError::InvalidPeriod(format!("{} has no following day", self.key()))
                })?;
                (date, next)
            }
        };
        Ok(Some(bounds))
    }

    /// UTC range `[local midnight at start, local midnight at end)` in `tz`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubesummary_core::period::Period;
    /// use cubesummary_core::tz::{format_rfc3339_utc, parse_tz};
    ///
    /// let chicago = parse_tz("America/Chicago").unwrap();
    /// let day = Period::new(Some(2010), Some(12), Some(30)).unwrap();
    /// let range = day.range(chicago).unwrap().unwrap();
    ///
    /// assert_eq!(format_rfc3339_utc(&range.begin), "2010-12-30T06:00:00Z");
    /// assert_eq!(format_rfc3339_utc(&range.end), "2010-12-31T06:00:00Z");
    /// ```
    pub fn range(&self, tz: Tz) -> Result<Option<TimeRange>> {
        match self.local_bounds()? {
            None => Ok(None),
            Some((start, end)) => {
                let begin = local_midnight_to_utc(start, tz)?;
                let end = local_midnight_to_utc(end, tz)?;
                TimeRange::new(begin, end).map(Some)
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        SummaryError::InvalidPeriod(format!("{year:04}-{month:02} is not a calendar month"))
    })
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = first_of_month(year, month)?;
    let end = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok((start, end))
}
