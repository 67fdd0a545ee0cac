//! Display-time formatting for search result pages.
//!
//! Every row shows the center time in the reporting timezone, with the UTC
//! instant as a secondary `Time UTC: …` label. Both strings come from the
//! same instant at one-second resolution.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, SummaryError};
use crate::index::{DatasetIndex, DatasetQuery};
use crate::models::{BoundingBox, Dataset};
use crate::period::Period;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix of the secondary UTC label.
pub const UTC_LABEL_PREFIX: &str = "Time UTC: ";

/// A center time rendered for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTime {
    /// Local time in the reporting timezone, e.g. `2011-01-01 09:03:13`.
    pub local: String,
    /// UTC label, e.g. `Time UTC: 2010-12-31 23:33:13`.
    pub utc_label: String,
}

/// Render `instant` for display in `tz`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cubesummary_core::display::display_time;
/// use cubesummary_core::tz::parse_tz;
///
/// let instant = Utc.with_ymd_and_hms(2010, 12, 31, 23, 33, 13).single().unwrap();
/// let shown = display_time(instant, parse_tz("Australia/Darwin").unwrap());
/// assert_eq!(shown.local, "2011-01-01 09:03:13");
/// assert_eq!(shown.utc_label, "Time UTC: 2010-12-31 23:33:13");
/// ```
pub fn display_time(instant: DateTime<Utc>, tz: Tz) -> DisplayTime {
    DisplayTime {
        local: instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
        utc_label: format!("{}{}", UTC_LABEL_PREFIX, instant.format(DISPLAY_FORMAT)),
    }
}

/// Parse a [`DisplayTime`] back into its instant.
///
/// The UTC label is authoritative; the local string must name the same
/// instant in `tz` (either occurrence, if it falls in a repeated hour).
pub fn parse_display_time(shown: &DisplayTime, tz: Tz) -> Result<DateTime<Utc>> {
    let utc_text = shown
        .utc_label
        .strip_prefix(UTC_LABEL_PREFIX)
        .ok_or_else(|| {
            SummaryError::ParseError(format!("Missing UTC label prefix: '{}'", shown.utc_label))
        })?;
    let instant = parse_display(utc_text)?.and_utc();

    let local = parse_display(&shown.local)?;
    let agrees = match tz.from_local_datetime(&local) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc) == instant,
        chrono::LocalResult::Ambiguous(a, b) => {
            a.with_timezone(&Utc) == instant || b.with_timezone(&Utc) == instant
        }
        chrono::LocalResult::None => false,
    };

    if !agrees {
        return Err(SummaryError::ParseError(format!(
            "Local time '{}' in {} does not match '{}'",
            shown.local, tz, shown.utc_label
        )));
    }
    Ok(instant)
}

fn parse_display(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), DISPLAY_FORMAT).map_err(|e| {
        SummaryError::ParseError(format!("Invalid display time '{}': {}", text, e))
    })
}

/// One row of a search results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRow {
    pub id: String,
    pub product: String,
    pub center_time: DisplayTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<BoundingBox>,
}

impl SearchRow {
    pub fn new(dataset: &Dataset, tz: Tz) -> Self {
        SearchRow {
            id: dataset.id.clone(),
            product: dataset.product.clone(),
            center_time: display_time(dataset.center_time, tz),
            footprint: dataset.bounding_box(),
        }
    }
}

/// Rows for an arbitrary query, sorted by center time.
pub fn search_rows<I: DatasetIndex>(index: &I, query: &DatasetQuery, tz: Tz) -> Vec<SearchRow> {
    index
        .search(query)
        .iter()
        .map(|dataset| SearchRow::new(dataset, tz))
        .collect()
}

/// Rows for the datasets of `product` in a local calendar period.
pub fn period_rows<I: DatasetIndex>(
    index: &I,
    product: &str,
    period: Period,
    tz: Tz,
    limit: Option<usize>,
) -> Result<Vec<SearchRow>> {
    let mut builder = DatasetQuery::builder(product);
    if let Some(range) = period.range(tz)? {
        builder = builder.time(range);
    }
    if let Some(limit) = limit {
        builder = builder.limit(limit);
    }
    Ok(search_rows(index, &builder.build()?, tz))
}
