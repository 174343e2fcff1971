//! EmbeddingProvider trait definition
//!
//! Defines the abstract interface for vector embedding generation.
//! Same shape as `GraphStore`: async trait + Send + Sync so the pipeline can
//! take `&dyn EmbeddingProvider`.

use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for generating vector embeddings from text.
///
/// # Implementations
///
/// - [`HttpEmbeddingProvider`](super::HttpEmbeddingProvider): Bedrock Titan or
///   OpenAI-compatible HTTP endpoint
/// - [`MockEmbeddingProvider`](super::MockEmbeddingProvider): deterministic mock
///   that produces consistent embeddings from text hashes (for tests)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a vector embedding for a single text input.
    ///
    /// Returns a vector of `f32` with length equal to [`dimensions()`](Self::dimensions).
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate vector embeddings for multiple texts, one per input, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any embedding in the batch fails. Nothing from a
    /// failed batch is returned.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// The dimensionality of the vectors produced by this provider.
    ///
    /// Must match the vector index configuration.
    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;

    /// How many texts the backfill embeds (and writes) per batch.
    fn batch_size(&self) -> usize;
}
