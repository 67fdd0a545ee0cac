//! # cubesummary-core
//!
//! Timezone-aware period summaries for a dataset catalog.
//!
//! Datasets carry a UTC center time. Overview pages group them by calendar
//! year, month and day in a configurable reporting timezone, so a dataset
//! observed at `2010-12-31 23:33:13` UTC counts towards 2011 in
//! `Australia/Darwin` and towards 2010 in `America/Chicago`.
//!
//! ## Features
//!
//! - **DST Safety**: Period boundaries are local midnights converted
//!   independently to UTC, so 23-hour and 25-hour days are exact.
//! - **Consistent Rollups**: Day counts add up to month counts, month counts
//!   to year counts, for any one timezone.
//! - **Typed Queries**: Index searches go through a validated [`DatasetQuery`].
//! - **Display Times**: Local time plus a `Time UTC: …` label for each row.
//!
//! ## Example
//!
//! ```rust
//! use cubesummary_core::prelude::*;
//!
//! let mut index = MemoryIndex::new();
//! let line = r#"{"id": "a", "product": "ls5_fc_albers", "center_time": "2010-12-31T23:33:13Z"}"#;
//! ingest_reader(line.as_bytes(), &mut index).unwrap();
//!
//! let mut store = SummaryStore::create(&index, "America/Chicago").unwrap();
//! store.generate("ls5_fc_albers").unwrap();
//!
//! let day = store.get("ls5_fc_albers", Some(2010), Some(12), Some(31)).unwrap();
//! assert_eq!(day.map(|s| s.dataset_count), Some(1));
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod index;
pub mod ingest;
pub mod models;
pub mod parse;
pub mod period;
pub mod store;
pub mod summary;
pub mod tz;

// Re-export commonly used types at the crate root
pub use config::Settings;
pub use display::{DisplayTime, SearchRow, display_time, parse_display_time, period_rows};
pub use error::{Result, SummaryError};
pub use index::{DatasetIndex, DatasetQuery, MemoryIndex};
pub use ingest::{IngestReport, ingest_path, ingest_reader};
pub use models::{BoundingBox, Dataset, PeriodSummary, TimeRange};
pub use period::{Granularity, Period};
pub use store::{GenerateReport, SummaryStore};

/// Prelude module for convenient imports.
///
/// ```
/// use cubesummary_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::display::{
        DisplayTime, SearchRow, display_time, parse_display_time, period_rows, search_rows,
    };
    pub use crate::error::{Result, SummaryError};
    pub use crate::index::{DatasetIndex, DatasetQuery, MemoryIndex};
    pub use crate::ingest::{IngestReport, ingest_path, ingest_reader};
    pub use crate::models::*;
    pub use crate::parse::{parse_bound, parse_center_time};
    pub use crate::period::{Granularity, Period};
    pub use crate::store::{GenerateReport, SummaryStore};
    pub use crate::tz::parse_tz;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_workflow_darwin_year_boundary() {
        let mut index = MemoryIndex::new();
        index.add(Dataset {
            id: "a".to_string(),
            product: "ls5_fc_albers".to_string(),
            center_time: chrono::Utc
                .with_ymd_and_hms(2010, 12, 31, 23, 33, 13)
                .single()
                .unwrap(),
            creation_time: None,
            footprint: None,
        });

        let mut store = SummaryStore::create(&index, "Australia/Darwin").unwrap();
        store.generate("ls5_fc_albers").unwrap();

        let year = store.get("ls5_fc_albers", Some(2011), None, None).unwrap();
        assert_eq!(year.map(|s| s.dataset_count), Some(1));
        assert!(store.get("ls5_fc_albers", Some(2010), None, None).unwrap().is_none());
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _tz = parse_tz("UTC").unwrap();
        let _granularity = Granularity::Day;
        let _period = Period::All;
    }
}
