//! Search service: embed a prompt, query the index, join the catalog.
//!
//! Built once at startup and read-only afterward, so concurrent searches
//! need no locking; share the service by `Arc` across request handlers.

use crate::catalog::Catalog;
use crate::error::{SearchError, SearchResult};
use crate::vector::{EmbeddingGenerator, VectorDimension, VectorIndex, sanitize};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// One search hit, projected from the catalog row at the matched position.
#[derive(Debug, Clone, Serialize)]
pub struct ResultItem {
    pub title: String,
    pub synopsis: String,
    pub language: String,
    pub year: Option<u32>,
    /// Squared Euclidean distance to the query; lower is closer.
    pub distance: f32,
}

/// Process-wide semantic search service.
///
/// Owns the catalog, its sanitized vector index, and the query embedder.
/// Catalog position `i` always corresponds to index row `i`; the sanitizer
/// guarantees the counts match by substituting zero vectors for
/// unrecoverable rows.
pub struct SearchService {
    catalog: Catalog,
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingGenerator>,
    dimension: VectorDimension,
}

impl SearchService {
    /// Sanitize the catalog's raw vectors and build the index over them.
    ///
    /// Emits one warning per anomalous row. Fails if the catalog is empty
    /// (`EmptyCorpus`) -- a service with nothing to match is a
    /// configuration error, fatal to startup.
    pub fn build(
        catalog: Catalog,
        embedder: Arc<dyn EmbeddingGenerator>,
        dimension: VectorDimension,
    ) -> SearchResult<Self> {
        let mut vectors = Vec::with_capacity(catalog.len());
        let mut anomaly_count = 0usize;

        for (position, record) in catalog.records().iter().enumerate() {
            let result = sanitize(record.vector.as_deref(), dimension);
            if let Some(anomaly) = &result.anomaly {
                warn!(position, title = %record.title, "catalog row recovered: {anomaly}");
                anomaly_count += 1;
            }
            vectors.push(result.vector);
        }

        if anomaly_count > 0 {
            warn!(
                anomaly_count,
                rows = catalog.len(),
                "catalog rows required vector recovery"
            );
        }

        let index = VectorIndex::build(&vectors)?;

        Ok(Self {
            catalog,
            index,
            embedder,
            dimension,
        })
    }

    /// Return up to `k` catalog entries closest to the prompt, closest
    /// first.
    ///
    /// Embedder failures surface as [`SearchError::Embedding`]; an empty
    /// result list is a valid outcome, distinct from any error.
    pub fn search(&self, prompt: &str, k: usize) -> SearchResult<Vec<ResultItem>> {
        let query = self
            .embedder
            .embed(prompt)
            .map_err(SearchError::Embedding)?;

        let preview_len = query.len().min(5);
        debug!(
            prompt,
            preview = ?&query[..preview_len],
            "embedded query prompt"
        );

        let hits = self.index.search(&query, k)?;
        debug!(?hits, "index returned raw positions and distances");

        let mut results = Vec::with_capacity(hits.len());
        for (position, distance) in hits {
            // Positions outside the catalog would mean an inconsistent
            // build; skip rather than fail the whole request.
            let Some(record) = self.catalog.get(position) else {
                warn!(position, "index position outside catalog bounds, skipping");
                continue;
            };
            results.push(ResultItem {
                title: record.title.clone(),
                synopsis: record.synopsis.clone(),
                language: record.language.clone(),
                year: record.year,
                distance,
            });
        }

        Ok(results)
    }

    /// Number of vectors in the corpus (equals the catalog row count).
    #[must_use]
    pub fn corpus_size(&self) -> usize {
        self.index.len()
    }

    /// Configured embedding dimension.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("corpus_size", &self.index.len())
            .field("dimension", &self.dimension)
            .field("embedder", &"<EmbeddingGenerator>")
            .finish()
    }
}
