//! Query embedding behind a trait seam.
//!
//! The search core treats embedding generation as an opaque collaborator:
//! `embed(text) -> Vec<f32>` of the configured dimension. The production
//! implementation wraps fastembed; tests substitute deterministic
//! implementations of the same trait.

use crate::vector::{VectorDimension, VectorError};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;

/// Trait for generating an embedding from prompt text.
///
/// Implementations must be thread-safe; the service shares one generator
/// across concurrent requests.
pub trait EmbeddingGenerator: Send + Sync {
    /// Generate the embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError>;

    /// Dimension of the embeddings this generator produces.
    #[must_use]
    fn dimension(&self) -> VectorDimension;
}

/// Resolves a configured model name to a fastembed model.
///
/// Only 384-dimensional models are supported, matching the catalog's
/// embedding dimension.
pub fn parse_embedding_model(name: &str) -> Result<EmbeddingModel, VectorError> {
    match name {
        "AllMiniLML6V2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "BGESmallENV15" => Ok(EmbeddingModel::BGESmallENV15),
        other => Err(VectorError::UnknownModel(other.to_string())),
    }
}

/// FastEmbed implementation of [`EmbeddingGenerator`].
///
/// Produces 384-dimensional embeddings. The model handle needs `&mut` to
/// embed, so it sits behind a `Mutex`; requests serialize only on the model
/// call itself.
pub struct FastEmbedGenerator {
    model: Mutex<TextEmbedding>,
    dimension: VectorDimension,
}

impl FastEmbedGenerator {
    /// Create a generator for the named model, caching model files under
    /// the workspace models directory.
    ///
    /// # Errors
    /// Returns an error if the model name is unknown or the model fails to
    /// initialize or download.
    pub fn new(model_name: &str) -> Result<Self, VectorError> {
        let model = parse_embedding_model(model_name)?;
        let text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(crate::init::models_dir())
                .with_show_download_progress(true),
        )
        .map_err(|e| VectorError::EmbeddingFailed(
            format!("Failed to initialize embedding model: {e}. Ensure you have internet connection for first-time model download")
        ))?;

        Ok(Self {
            model: Mutex::new(text_model),
            dimension: VectorDimension::dimension_384(),
        })
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let embeddings = self
            .model
            .lock()
            .map_err(|_| {
                VectorError::EmbeddingFailed(
                    "Failed to acquire embedding model lock - model may be poisoned".to_string(),
                )
            })?
            .embed(vec![text.to_string()], None)
            .map_err(|e| {
                VectorError::EmbeddingFailed(format!("Failed to generate embedding: {e}"))
            })?;

        let embedding = embeddings.into_iter().next().ok_or_else(|| {
            VectorError::EmbeddingFailed("Model returned no embedding".to_string())
        })?;

        self.dimension.validate_vector(&embedding)?;
        Ok(embedding)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Deterministic generator for unit tests. Maps a few known keywords onto
/// fixed directions so similarity assertions are stable.
#[cfg(test)]
pub struct MockEmbeddingGenerator {
    dimension: VectorDimension,
}

#[cfg(test)]
impl MockEmbeddingGenerator {
    #[must_use]
    pub fn with_dimension(dimension: VectorDimension) -> Self {
        Self { dimension }
    }
}

#[cfg(test)]
impl EmbeddingGenerator for MockEmbeddingGenerator {
    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let dim = self.dimension.get();
        let mut embedding = vec![0.1; dim];

        if text.contains("space") && dim > 1 {
            embedding[0] = 0.9;
            embedding[1] = 0.8;
        }
        if text.contains("romance") && dim > 3 {
            embedding[2] = 0.85;
            embedding[3] = 0.75;
        }
        if text.contains("heist") && dim > 5 {
            embedding[4] = 0.8;
            embedding[5] = 0.7;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in &mut embedding {
                *val /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_generator_dimension_and_normalization() {
        let generator =
            MockEmbeddingGenerator::with_dimension(VectorDimension::dimension_384());
        let embedding = generator.embed("a heist in space").unwrap();

        assert_eq!(embedding.len(), 384);
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_mock_generator_is_deterministic() {
        let generator =
            MockEmbeddingGenerator::with_dimension(VectorDimension::new(8).unwrap());
        assert_eq!(
            generator.embed("romance").unwrap(),
            generator.embed("romance").unwrap()
        );
    }

    // Downloads the model on first run; run with --ignored when the
    // network and cache are available.
    #[test]
    #[ignore = "requires embedding model download"]
    fn test_fastembed_generator_produces_384_dims() {
        let generator = FastEmbedGenerator::new("AllMiniLML6V2").unwrap();
        assert_eq!(generator.dimension().get(), 384);

        let embedding = generator.embed("a heist that goes wrong").unwrap();
        assert_eq!(embedding.len(), 384);
        assert!(embedding.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_unknown_model_name_is_rejected() {
        let result = parse_embedding_model("NotARealModel");
        assert!(matches!(result, Err(VectorError::UnknownModel(_))));
    }

    #[test]
    fn test_known_model_names_parse() {
        assert!(parse_embedding_model("AllMiniLML6V2").is_ok());
        assert!(parse_embedding_model("BGESmallENV15").is_ok());
    }
}
