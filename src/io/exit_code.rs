//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - operation completed, results found
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - critical failure that should halt automation
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::SearchError;
use crate::vector::VectorError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// No results found but the command executed successfully (code 3)
    NotFound = 3,

    /// Failed to parse input (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a search based on result presence.
    ///
    /// Zero matches is a valid outcome, distinguished from errors by code
    /// 3 rather than a failure status.
    pub fn from_search_results<T>(results: &[T]) -> Self {
        if results.is_empty() {
            ExitCode::NotFound
        } else {
            ExitCode::Success
        }
    }

    /// Convert a `SearchError` to the appropriate exit code.
    pub fn from_error(error: &SearchError) -> Self {
        match error {
            SearchError::CatalogRead { .. } => ExitCode::IoError,

            // An empty or inconsistent corpus means the service cannot
            // start at all
            SearchError::Index(
                VectorError::EmptyCorpus | VectorError::InconsistentCorpus { .. },
            ) => ExitCode::BlockingError,

            SearchError::Index(VectorError::DimensionMismatch { .. }) => ExitCode::ConfigError,
            SearchError::Index(VectorError::UnknownModel(_)) => ExitCode::ConfigError,
            SearchError::Config { .. } => ExitCode::ConfigError,

            SearchError::Embedding(_) => ExitCode::GeneralError,
            SearchError::Index(_) => ExitCode::GeneralError,
        }
    }

    /// Check if this exit code indicates a blocking error.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, ExitCode::BlockingError)
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::GeneralError as u8, 1);
        assert_eq!(ExitCode::BlockingError as u8, 2);
        assert_eq!(ExitCode::NotFound as u8, 3);
    }

    #[test]
    fn test_from_search_results() {
        assert_eq!(
            ExitCode::from_search_results(&["hit"]),
            ExitCode::Success
        );
        let empty: [&str; 0] = [];
        assert_eq!(ExitCode::from_search_results(&empty), ExitCode::NotFound);
    }

    #[test]
    fn test_empty_corpus_is_blocking() {
        let err = SearchError::Index(VectorError::EmptyCorpus);
        assert_eq!(ExitCode::from_error(&err), ExitCode::BlockingError);
        assert!(ExitCode::from_error(&err).is_blocking());
    }

    #[test]
    fn test_embedding_failure_is_general_error() {
        let err = SearchError::Embedding(VectorError::EmbeddingFailed("down".into()));
        assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    }
}
