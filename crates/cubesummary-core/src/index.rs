//! Dataset index abstraction.
//!
//! The summary store only needs range queries by product and time, so the
//! index is consumed through [`DatasetIndex`]. [`MemoryIndex`] keeps each
//! product's datasets sorted by center time and answers queries with two
//! binary searches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SummaryError};
use crate::models::{Dataset, TimeRange};

/// A validated dataset search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetQuery {
    product: String,
    time: Option<TimeRange>,
    limit: Option<usize>,
}

impl DatasetQuery {
    /// Start building a query for `product`.
    ///
    /// ```
    /// use cubesummary_core::index::DatasetQuery;
    ///
    /// let query = DatasetQuery::builder("ls5_fc_albers").limit(5).build().unwrap();
    /// assert_eq!(query.limit(), Some(5));
    /// assert!(DatasetQuery::builder("").build().is_err());
    /// ```
    pub fn builder(product: impl Into<String>) -> DatasetQueryBuilder {
        DatasetQueryBuilder {
            product: product.into(),
            time: None,
            limit: None,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn time(&self) -> Option<&TimeRange> {
        self.time.as_ref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The same query without a result limit.
    pub fn unlimited(&self) -> DatasetQuery {
        DatasetQuery {
            limit: None,
            ..self.clone()
        }
    }
}

/// Builder for [`DatasetQuery`].
#[derive(Debug, Clone)]
pub struct DatasetQueryBuilder {
    product: String,
    time: Option<TimeRange>,
    limit: Option<usize>,
}

impl DatasetQueryBuilder {
    /// Restrict to datasets whose center time lies in `range` (half-open).
    pub fn time(mut self, range: TimeRange) -> Self {
        self.time = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<DatasetQuery> {
        if self.product.trim().is_empty() {
            return Err(SummaryError::InvalidQuery(
                "product name must not be empty".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(SummaryError::InvalidQuery(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(DatasetQuery {
            product: self.product,
            time: self.time,
            limit: self.limit,
        })
    }
}

/// Read access to indexed datasets.
pub trait DatasetIndex {
    /// Names of all products with at least one dataset.
    fn products(&self) -> Vec<String>;

    /// Datasets matching `query`, sorted by center time, truncated to the limit.
    fn search(&self, query: &DatasetQuery) -> Vec<Dataset>;

    /// Number of datasets matching `query`, ignoring its limit.
    fn count(&self, query: &DatasetQuery) -> usize {
        self.search(&query.unlimited()).len()
    }
}

impl<T: DatasetIndex + ?Sized> DatasetIndex for &T {
    fn products(&self) -> Vec<String> {
        (**self).products()
    }

    fn search(&self, query: &DatasetQuery) -> Vec<Dataset> {
        (**self).search(query)
    }

    fn count(&self, query: &DatasetQuery) -> usize {
        (**self).count(query)
    }
}

impl<T: DatasetIndex + ?Sized> DatasetIndex for Arc<T> {
    fn products(&self) -> Vec<String> {
        (**self).products()
    }

    fn search(&self, query: &DatasetQuery) -> Vec<Dataset> {
        (**self).search(query)
    }

    fn count(&self, query: &DatasetQuery) -> usize {
        (**self).count(query)
    }
}

/// In-memory index, sorted by `(center_time, id)` per product.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    products: BTreeMap<String, Vec<Dataset>>,
    ids: BTreeSet<String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset. Returns `false` if a dataset with the same id is
    /// already indexed, in which case the index is unchanged.
    pub fn add(&mut self, dataset: Dataset) -> bool {
        if !self.ids.insert(dataset.id.clone()) {
            debug!(id = %dataset.id, "dataset already indexed");
            return false;
        }

        debug!(id = %dataset.id, product = %dataset.product, "indexing dataset");
        let datasets = self.products.entry(dataset.product.clone()).or_default();
        let pos = datasets.partition_point(|d| {
            (d.center_time, d.id.as_str()) < (dataset.center_time, dataset.id.as_str())
        });
        datasets.insert(pos, dataset);
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn matching(&self, query: &DatasetQuery) -> &[Dataset] {
        let Some(datasets) = self.products.get(query.product()) else {
            return &[];
        };
        match query.time() {
            None => datasets,
            Some(range) => {
                let lower = datasets.partition_point(|d| d.center_time < range.begin);
                let upper = datasets.partition_point(|d| d.center_time < range.end);
                &datasets[lower..upper]
            }
        }
    }
}

impl DatasetIndex for MemoryIndex {
    fn products(&self) -> Vec<String> {
        self.products.keys().cloned().collect()
    }

    fn search(&self, query: &DatasetQuery) -> Vec<Dataset> {
        let matching = self.matching(query);
        let take = query.limit().unwrap_or(matching.len());
        matching.iter().take(take).cloned().collect()
    }

    fn count(&self, query: &DatasetQuery) -> usize {
        self.matching(query).len()
    }
}
