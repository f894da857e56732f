//! The main library module for plotfind

// Debug macro for consistent debug output
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        if $crate::config::is_global_debug_enabled() {
            eprintln!("DEBUG: {}", format!($($arg)*));
        }
    };
}

pub mod catalog;
pub mod config;
pub mod error;
pub mod init;
pub mod io;
pub mod search;
#[cfg(feature = "http-server")]
pub mod server;
pub mod vector;

// Explicit exports for better API clarity
pub use catalog::{Catalog, CatalogRecord, DimensionAudit, RowAnomaly};
pub use config::Settings;
pub use error::{ErrorContext, SearchError, SearchResult};
pub use search::{ResultItem, SearchService};
pub use vector::{
    EmbeddingGenerator, FastEmbedGenerator, VECTOR_DIMENSION_384, VectorDimension, VectorError,
    VectorIndex,
};
