//! Dataset document ingestion.
//!
//! Documents are JSON Lines, one dataset per line:
//!
//! ```text
//! {"id": "…", "product": "ls5_fc_albers", "center_time": "2010-12-31T23:33:13Z",
//!  "creation_time": "2017-05-02T03:11:09Z", "footprint": {"type": "Polygon", …}}
//! ```
//!
//! A malformed document never aborts the batch. It is recorded in the
//! [`IngestReport`] and loading carries on with the next line; callers decide
//! whether the failure tally is acceptable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use geo::{Geometry, MultiPolygon};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SummaryError};
use crate::index::MemoryIndex;
use crate::models::Dataset;
use crate::parse::parse_center_time;

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    id: String,
    product: String,
    center_time: String,
    #[serde(default)]
    creation_time: Option<String>,
    #[serde(default)]
    footprint: Option<geojson::Geometry>,
}

/// A document that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestFailure {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: String,
}

/// Outcome of loading a batch of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added: usize,
    pub duplicates: usize,
    pub failures: Vec<IngestFailure>,
}

/// Parse one dataset document.
pub fn parse_document(line: &str) -> Result<Dataset> {
    let doc: DatasetDocument = serde_json::from_str(line)
        .map_err(|e| SummaryError::ParseError(format!("Invalid dataset document: {}", e)))?;

    let center_time = parse_center_time(&doc.center_time)?;
    let creation_time = doc
        .creation_time
        .as_deref()
        .map(parse_center_time)
        .transpose()?;
    let footprint = doc.footprint.map(footprint_from_geojson).transpose()?;

    Ok(Dataset {
        id: doc.id,
        product: doc.product,
        center_time,
        creation_time,
        footprint,
    })
}

fn footprint_from_geojson(geometry: geojson::Geometry) -> Result<MultiPolygon<f64>> {
    let geometry: Geometry<f64> = geometry
        .try_into()
        .map_err(|e| SummaryError::ParseError(format!("Invalid footprint: {}", e)))?;

    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        _ => Err(SummaryError::ParseError(
            "Footprint must be a Polygon or MultiPolygon".to_string(),
        )),
    }
}

/// Load every document from `reader` into `index`.
///
/// Only I/O errors are returned as `Err`; bad documents end up in
/// [`IngestReport::failures`]. Blank lines and `#` comments are skipped.
pub fn ingest_reader<R: BufRead>(reader: R, index: &mut MemoryIndex) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_document(trimmed) {
            Ok(dataset) => {
                if index.add(dataset) {
                    report.added += 1;
                } else {
                    report.duplicates += 1;
                }
            }
            Err(e) => {
                warn!(line = n + 1, error = %e, "skipping dataset document");
                report.failures.push(IngestFailure {
                    line: n + 1,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        added = report.added,
        duplicates = report.duplicates,
        failed = report.failures.len(),
        "ingestion finished"
    );
    Ok(report)
}

/// Load a JSON Lines file into `index`.
pub fn ingest_path(path: impl AsRef<Path>, index: &mut MemoryIndex) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SummaryError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open '{}': {}", path.display(), e),
        ))
    })?;
    ingest_reader(BufReader::new(file), index)
}
