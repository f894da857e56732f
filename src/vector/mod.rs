//! Vector sanitation and nearest-neighbor search.
//!
//! This module owns the algorithmic core of the service: coercing raw
//! catalog embeddings into a uniform dimension, holding them in a dense
//! in-memory index, and answering exact top-k queries by squared Euclidean
//! distance.

mod embedding;
mod index;
mod sanitize;
mod types;

#[cfg(test)]
pub use embedding::MockEmbeddingGenerator;
pub use embedding::{EmbeddingGenerator, FastEmbedGenerator, parse_embedding_model};
pub use index::VectorIndex;
pub use sanitize::{Anomaly, Sanitized, sanitize};
pub use types::{VECTOR_DIMENSION_384, VectorDimension, VectorError};
