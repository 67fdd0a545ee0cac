//! Core data types for cubesummary.
//!
//! This module defines the primary types used throughout the library:
//! - [`Dataset`] - An indexed dataset record
//! - [`TimeRange`] - A half-open UTC instant range
//! - [`BoundingBox`] - A lon/lat footprint envelope
//! - [`PeriodSummary`] - Aggregate for a product over a calendar period

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use geo::{BoundingRect, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};
use crate::period::Period;

/// A dataset record as held by the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Opaque dataset identifier.
    pub id: String,
    /// Product (dataset type) name.
    pub product: String,
    /// Representative observation time.
    pub center_time: DateTime<Utc>,
    /// When the dataset itself was produced, if known.
    pub creation_time: Option<DateTime<Utc>>,
    /// Spatial footprint in lon/lat.
    pub footprint: Option<MultiPolygon<f64>>,
}

impl Dataset {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.footprint
            .as_ref()
            .and_then(|p| p.bounding_rect())
            .map(BoundingBox::from)
    }
}

/// A half-open range of instants, `begin <= t < end`.
///
/// Both edges are normalized to UTC whatever zone they were built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range from two timezone-aware instants.
    ///
    /// Returns an error unless `begin` is strictly before `end`.
    pub fn new<T: TimeZone>(begin: DateTime<T>, end: DateTime<T>) -> Result<Self> {
        let begin = begin.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if begin >= end {
            return Err(SummaryError::InvalidQuery(format!(
                "time range begin {} is not before end {}",
                begin.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { begin, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.begin <= instant && instant < self.end
    }
}

/// Envelope of one or more footprints, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
        }
    }
}

/// Precomputed aggregate for a product over one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub product: String,
    pub period: Period,
    /// Reporting timezone the period boundaries were computed in.
    pub grouping_time_zone: String,
    pub dataset_count: usize,
    /// UTC span of the period itself; absent for [`Period::All`].
    pub time_range: Option<TimeRange>,
    /// Dataset counts per child period key (years, months or days).
    pub timeline: BTreeMap<String, usize>,
    pub earliest_center_time: Option<DateTime<Utc>>,
    pub latest_center_time: Option<DateTime<Utc>>,
    pub newest_dataset_creation_time: Option<DateTime<Utc>>,
    pub footprint: Option<BoundingBox>,
}
