//! The summary store.
//!
//! A [`SummaryStore`] is bound to one reporting timezone for its whole life.
//! Generation walks every local day that holds a dataset, adds the enclosing
//! month, year and the product-wide period, and summarises each of them with
//! a range query against the index. Because sibling periods share their
//! midnight boundaries, day counts add up to month counts and month counts to
//! year counts.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SummaryError};
use crate::index::{DatasetIndex, DatasetQuery};
use crate::models::{Dataset, PeriodSummary};
use crate::period::{Granularity, Period};
use crate::summary::summarise;
use crate::tz::parse_tz;

/// What a call to [`SummaryStore::generate`] produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub product: String,
    pub grouping_time_zone: String,
    pub dataset_count: usize,
    /// Number of period summaries written (including the product-wide one).
    pub periods: usize,
    /// Dataset count per local year.
    pub years: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SummaryFile {
    grouping_time_zone: String,
    summaries: Vec<PeriodSummary>,
}

/// Generated period summaries over a dataset index.
#[derive(Debug)]
pub struct SummaryStore<I> {
    index: I,
    tz: Tz,
    summaries: BTreeMap<(String, Period), PeriodSummary>,
}

impl<I: DatasetIndex> SummaryStore<I> {
    /// Create an empty store. An unknown timezone fails here rather than on
    /// the first query.
    pub fn create(index: I, grouping_time_zone: &str) -> Result<Self> {
        let tz = parse_tz(grouping_time_zone)?;
        Ok(Self {
            index,
            tz,
            summaries: BTreeMap::new(),
        })
    }

    /// Open a summary file, adopting the timezone it was generated in.
    pub fn open(index: I, path: impl AsRef<Path>) -> Result<Self> {
        let file: SummaryFile = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        let mut store = Self::create(index, &file.grouping_time_zone)?;
        for summary in file.summaries {
            if summary.grouping_time_zone != file.grouping_time_zone {
                return Err(SummaryError::StoreError(format!(
                    "summary {} {} was generated in {}, file is for {}",
                    summary.product, summary.period, summary.grouping_time_zone, file.grouping_time_zone
                )));
            }
            store
                .summaries
                .insert((summary.product.clone(), summary.period), summary);
        }
        debug!(count = store.summaries.len(), "loaded summaries");
        Ok(store)
    }

    /// Open a summary file and require it to match `grouping_time_zone`.
    pub fn load(index: I, path: impl AsRef<Path>, grouping_time_zone: &str) -> Result<Self> {
        let expected = parse_tz(grouping_time_zone)?;
        let store = Self::open(index, path)?;
        if store.tz != expected {
            return Err(SummaryError::StoreError(format!(
                "summaries were generated in {}, not {}; regenerate them",
                store.tz, expected
            )));
        }
        Ok(store)
    }

    /// Write all summaries as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = SummaryFile {
            grouping_time_zone: self.tz.to_string(),
            summaries: self.summaries.values().cloned().collect(),
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn grouping_time_zone(&self) -> Tz {
        self.tz
    }

    /// Search the underlying index.
    pub fn search(&self, query: &DatasetQuery) -> Vec<Dataset> {
        self.index.search(query)
    }

    /// Regenerate every summary of `product`, replacing what was there.
    pub fn generate(&mut self, product: &str) -> Result<GenerateReport> {
        let query = DatasetQuery::builder(product).build()?;
        let datasets = self.index.search(&query);

        let mut periods = BTreeSet::from([Period::All]);
        for dataset in &datasets {
            let mut period = Some(Period::of(dataset.center_time, self.tz, Granularity::Day));
            while let Some(p) = period {
                if !periods.insert(p) {
                    break;
                }
                period = p.parent();
            }
        }

        let mut generated = BTreeMap::new();
        for period in periods {
            let summary = self.summarise_period(product, period)?;
            debug!(product, period = %period, count = summary.dataset_count, "summarised");
            generated.insert((product.to_string(), period), summary);
        }

        self.summaries.retain(|(p, _), _| p != product);
        self.summaries.extend(generated);

        let years = self
            .summaries
            .get(&(product.to_string(), Period::All))
            .map(|s| s.timeline.clone())
            .unwrap_or_default();
        let report = GenerateReport {
            product: product.to_string(),
            grouping_time_zone: self.tz.to_string(),
            dataset_count: datasets.len(),
            periods: self.summaries.keys().filter(|(p, _)| p == product).count(),
            years,
        };
        info!(
            product,
            tz = %self.tz,
            datasets = report.dataset_count,
            periods = report.periods,
            "generated summaries"
        );
        Ok(report)
    }

    /// Regenerate every product known to the index.
    pub fn generate_all(&mut self) -> Result<Vec<GenerateReport>> {
        let products = self.index.products();
        products
            .iter()
            .map(|product| self.generate(product))
            .collect()
    }

    /// Summarise one period directly from the index, without storing it.
    pub fn summarise_period(&self, product: &str, period: Period) -> Result<PeriodSummary> {
        let mut builder = DatasetQuery::builder(product);
        if let Some(range) = period.range(self.tz)? {
            builder = builder.time(range);
        }
        let datasets = self.index.search(&builder.build()?);
        summarise(product, period, self.tz, &datasets)
    }

    /// Fetch a stored summary. The period is validated before lookup, so a
    /// day without a month is an error rather than a miss.
    ///
    /// `Ok(None)` means nothing was generated for that product and period.
    pub fn get(
        &self,
        product: &str,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Result<Option<&PeriodSummary>> {
        let period = Period::new(year, month, day)?;
        Ok(self.get_period(product, period))
    }

    pub fn get_period(&self, product: &str, period: Period) -> Option<&PeriodSummary> {
        self.summaries.get(&(product.to_string(), period))
    }

    /// Products that have generated summaries.
    pub fn products(&self) -> Vec<String> {
        self.summaries
            .keys()
            .map(|(product, _)| product.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Local years holding datasets of `product`, for year navigation.
    pub fn years(&self, product: &str) -> Vec<i32> {
        self.summaries
            .iter()
            .filter(|((p, period), summary)| {
                p == product && matches!(period, Period::Year { .. }) && summary.dataset_count > 0
            })
            .filter_map(|((_, period), _)| period.year())
            .collect()
    }

    /// Stored summaries of `product` directly below `period`, in order.
    pub fn children(&self, product: &str, period: Period) -> Vec<&PeriodSummary> {
        self.summaries
            .iter()
            .filter(|((p, child), _)| p == product && child.parent() == Some(period))
            .map(|(_, summary)| summary)
            .collect()
    }
}
