//! Period summary computation.
//!
//! Summaries are computed from the datasets that fall inside a period's UTC
//! range. The child timeline buckets the same datasets one level down, so a
//! month's timeline holds exactly the counts its day summaries will report.

use std::collections::BTreeMap;

use chrono_tz::Tz;

use crate::error::Result;
use crate::models::{Dataset, PeriodSummary};
use crate::period::{Granularity, Period};

/// Granularity of the timeline stored with a summary of `period`.
pub fn timeline_granularity(period: &Period) -> Option<Granularity> {
    match period {
        Period::All => Some(Granularity::Year),
        Period::Year { .. } => Some(Granularity::Month),
        Period::Month { .. } => Some(Granularity::Day),
        Period::Day { .. } => None,
    }
}

/// Summarise `datasets`, which must already be restricted to `period`.
pub fn summarise(
    product: &str,
    period: Period,
    tz: Tz,
    datasets: &[Dataset],
) -> Result<PeriodSummary> {
    let mut timeline: BTreeMap<String, usize> = period
        .children()?
        .into_iter()
        .map(|child| (child.key(), 0))
        .collect();

    if let Some(granularity) = timeline_granularity(&period) {
        for dataset in datasets {
            let child = Period::of(dataset.center_time, tz, granularity);
            *timeline.entry(child.key()).or_insert(0) += 1;
        }
    }

    let footprint = datasets
        .iter()
        .filter_map(Dataset::bounding_box)
        .reduce(|acc, bbox| acc.union(&bbox));

    Ok(PeriodSummary {
        product: product.to_string(),
        period,
        grouping_time_zone: tz.to_string(),
        dataset_count: datasets.len(),
        time_range: period.range(tz)?,
        timeline,
        earliest_center_time: datasets.iter().map(|d| d.center_time).min(),
        latest_center_time: datasets.iter().map(|d| d.center_time).max(),
        newest_dataset_creation_time: datasets.iter().filter_map(|d| d.creation_time).max(),
        footprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_tz;
    use chrono::{DateTime, TimeZone, Utc};
    use geo::{MultiPolygon, polygon};

    fn dataset(id: &str, center_time: DateTime<Utc>, lon: f64) -> Dataset {
        Dataset {
            id: id.to_string(),
            product: "ls5_fc_albers".to_string(),
            center_time,
            creation_time: Some(Utc.with_ymd_and_hms(2017, 5, 1, 0, 0, 0).single().unwrap()),
            footprint: Some(MultiPolygon(vec![polygon![
                (x: lon, y: -13.0),
                (x: lon + 1.0, y: -13.0),
                (x: lon + 1.0, y: -12.0),
                (x: lon, y: -12.0),
            ]])),
        }
    }

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2010, 12, d, h, 0, 0).single().unwrap()
    }

    #[test]
    fn month_summary_has_daily_timeline() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let datasets = vec![
            dataset("a", utc(31, 0), 130.0),
            dataset("b", utc(31, 23), 132.0),
        ];
        let period = Period::Month {
            year: 2010,
            month: 12,
        };
        let summary = summarise("ls5_fc_albers", period, chicago, &datasets).unwrap();

        assert_eq!(summary.dataset_count, 2);
        assert_eq!(summary.timeline.len(), 31);
        assert_eq!(summary.timeline["2010-12-30"], 1);
        assert_eq!(summary.timeline["2010-12-31"], 1);
        assert_eq!(summary.timeline.values().sum::<usize>(), 2);
        assert_eq!(summary.grouping_time_zone, "America/Chicago");
    }

    #[test]
    fn footprint_is_union_of_datasets() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let datasets = vec![
            dataset("a", utc(31, 0), 130.0),
            dataset("b", utc(31, 1), 132.0),
        ];
        let summary = summarise("ls5_fc_albers", Period::All, chicago, &datasets).unwrap();
        let bbox = summary.footprint.unwrap();

        assert_eq!(bbox.west, 130.0);
        assert_eq!(bbox.east, 133.0);
        assert!(summary.time_range.is_none());
        assert_eq!(summary.timeline["2010"], 2);
    }

    #[test]
    fn empty_period_summary() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let period = Period::Day {
            year: 2010,
            month: 12,
            day: 25,
        };
        let summary = summarise("ls5_fc_albers", period, chicago, &[]).unwrap();

        assert_eq!(summary.dataset_count, 0);
        assert!(summary.timeline.is_empty());
        assert!(summary.footprint.is_none());
        assert!(summary.earliest_center_time.is_none());
        assert!(summary.time_range.is_some());
    }

    #[test]
    fn time_span_and_creation_time() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let datasets = vec![
            dataset("a", utc(30, 12), 130.0),
            dataset("b", utc(31, 3), 130.0),
        ];
        let summary = summarise("ls5_fc_albers", Period::All, chicago, &datasets).unwrap();

        assert_eq!(summary.earliest_center_time, Some(utc(30, 12)));
        assert_eq!(summary.latest_center_time, Some(utc(31, 3)));
        assert!(summary.newest_dataset_creation_time.is_some());
    }
}
