//! Movie catalog loading and inspection.
//!
//! The catalog is a CSV export with one row per movie: a raw embedding in
//! the `vector` column plus display metadata. Rows are read once at startup
//! in file order; that order defines the position space shared with the
//! vector index.

use crate::error::{SearchError, SearchResult};
use crate::vector::{Anomaly, VectorDimension, sanitize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One catalog row as stored in the CSV.
///
/// The `vector` column is an opaque textual encoding (for example
/// `"[0.1, -0.2, ...]"`) that may be empty, malformed, or the wrong length;
/// the sanitizer decides what to do with it. The remaining fields are used
/// only for display.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub vector: Option<String>,
    pub title: String,
    pub synopsis: String,
    pub language: String,
    pub year: Option<u32>,
}

/// Immutable, ordered movie catalog.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Load a catalog from a CSV file with a header row.
    pub fn load(path: &Path) -> SearchResult<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| SearchError::CatalogRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: CatalogRecord = row.map_err(|e| SearchError::CatalogRead {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Build a catalog directly from records. Used by tests and callers
    /// with a non-CSV source.
    #[must_use]
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Record at `position`, if in bounds.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&CatalogRecord> {
        self.records.get(position)
    }

    /// All records in catalog order.
    #[must_use]
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Audit the raw vector column against a target dimension.
    ///
    /// Reports the distribution of parsed vector lengths and every row that
    /// would need recovery, without building anything. This is the
    /// diagnostic used by `plotfind check` to inspect a catalog that mixes
    /// embedding model versions.
    #[must_use]
    pub fn audit(&self, target: VectorDimension) -> DimensionAudit {
        let mut length_counts = BTreeMap::new();
        let mut anomalies = Vec::new();

        for (position, record) in self.records.iter().enumerate() {
            let result = sanitize(record.vector.as_deref(), target);
            if let Some(anomaly) = &result.anomaly {
                if let Anomaly::LengthMismatch { found } = anomaly {
                    *length_counts.entry(*found).or_insert(0) += 1;
                } else {
                    *length_counts.entry(0).or_insert(0) += 1;
                }
                anomalies.push(RowAnomaly {
                    position,
                    title: record.title.clone(),
                    reason: anomaly.to_string(),
                });
            } else {
                *length_counts.entry(target.get()).or_insert(0) += 1;
            }
        }

        DimensionAudit {
            rows: self.records.len(),
            target_dimension: target.get(),
            length_counts,
            anomalies,
        }
    }
}

/// Result of a catalog dimension audit.
#[derive(Debug, Serialize)]
pub struct DimensionAudit {
    /// Total rows inspected.
    pub rows: usize,
    /// Dimension the index would coerce everything to.
    pub target_dimension: usize,
    /// Count of rows per observed vector length. Missing and unparsable
    /// rows are counted under length 0.
    pub length_counts: BTreeMap<usize, usize>,
    /// Rows that would need recovery, in catalog order.
    pub anomalies: Vec<RowAnomaly>,
}

impl DimensionAudit {
    /// True when every row already has the target dimension.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// One anomalous catalog row found by the audit.
#[derive(Debug, Serialize)]
pub struct RowAnomaly {
    pub position: usize,
    pub title: String,
    pub reason: String,
}
