//! Error types for the semantic search service.
//!
//! Structured errors using thiserror, with stable status codes for JSON
//! output and recovery suggestions for the CLI.

use crate::vector::VectorError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for catalog loading and search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Catalog file could not be read or parsed. Fatal to startup.
    #[error("Failed to read catalog '{path}': {source}")]
    CatalogRead {
        path: PathBuf,
        source: Box<csv::Error>,
    },

    /// Index construction or query-shape failure. An empty or inconsistent
    /// corpus is fatal to startup; a query dimension mismatch indicates a
    /// configuration bug and is fatal to the request.
    #[error("Vector index error: {0}")]
    Index(#[from] VectorError),

    /// The external embedder failed. Fatal to the request, never retried,
    /// never fatal to the process.
    #[error("Embedding generation failed: {0}")]
    Embedding(#[source] VectorError),

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl SearchError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier usable in JSON responses for
    /// programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::CatalogRead { .. } => "CATALOG_READ_ERROR",
            Self::Index(VectorError::EmptyCorpus | VectorError::InconsistentCorpus { .. }) => {
                "CORPUS_CONFIG_ERROR"
            }
            Self::Index(VectorError::DimensionMismatch { .. }) => "DIMENSION_MISMATCH",
            Self::Index(_) => "VECTOR_ERROR",
            Self::Embedding(_) => "EMBEDDING_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::CatalogRead { .. } => vec![
                "Check that the catalog path in settings.toml points to an existing CSV file",
                "Ensure the file has the columns: vector, title, synopsis, language, year",
            ],
            Self::Index(VectorError::EmptyCorpus) => vec![
                "The catalog has no rows; add at least one entry before starting the service",
            ],
            Self::Index(VectorError::DimensionMismatch { .. }) => vec![
                "The configured embedding dimension does not match the model output",
                "Check embedding.dimension in settings.toml",
            ],
            Self::Embedding(_) => vec![
                "Verify the embedding model downloaded correctly",
                "Retry the request; the catalog and index are unaffected",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for search service operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, SearchError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, SearchError> {
        self.map_err(|e| SearchError::Config {
            reason: format!("{msg}: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        let err = SearchError::Index(VectorError::EmptyCorpus);
        assert_eq!(err.status_code(), "CORPUS_CONFIG_ERROR");

        let err = SearchError::Index(VectorError::DimensionMismatch {
            expected: 384,
            actual: 768,
        });
        assert_eq!(err.status_code(), "DIMENSION_MISMATCH");

        let err = SearchError::Embedding(VectorError::EmbeddingFailed("boom".into()));
        assert_eq!(err.status_code(), "EMBEDDING_ERROR");
    }

    #[test]
    fn test_empty_corpus_has_suggestions() {
        let err = SearchError::Index(VectorError::EmptyCorpus);
        assert!(!err.recovery_suggestions().is_empty());
    }
}
