//! Mock embedding provider for tests
//!
//! Hash-derived vectors: equal descriptions embed identically, distinct ones
//! differ. Failure injection after N texts drives the backfill resume tests.

use super::traits::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Deterministic mock embedding provider for tests.
///
/// Stands in for Titan or OpenAI in backfill and query tests. Vectors are
/// unit length, so cosine scores from a vector index behave as with the
/// real providers.
///
/// # Example
///
/// ```rust
/// use populate_graph::embeddings::MockEmbeddingProvider;
/// use populate_graph::embeddings::EmbeddingProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockEmbeddingProvider::new(1024);
/// let cooling = provider.embed_text("Battery cooling loop").await.unwrap();
/// assert_eq!(cooling.len(), 1024);
/// assert_eq!(cooling, provider.embed_text("Battery cooling loop").await.unwrap());
/// assert_ne!(cooling, provider.embed_text("Charging port").await.unwrap());
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    batch_size: usize,
    /// Texts embedded so far, across clones
    embedded: Arc<AtomicUsize>,
    fail_after: Option<usize>,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given embedding dimensions.
    ///
    /// Use 1024 to match Titan v2 (production default).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            batch_size: 25,
            embedded: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Fail every request once `limit` texts have been embedded.
    ///
    /// A batch that would cross the limit fails as a whole.
    pub fn failing_after(mut self, limit: usize) -> Self {
        self.fail_after = Some(limit);
        self
    }

    /// Number of texts embedded successfully so far.
    pub fn embedded_count(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }

    fn reserve(&self, count: usize) -> Result<()> {
        let done = self.embedded.load(Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if done + count > limit {
                anyhow::bail!("Mock embedding provider unavailable after {} texts", limit);
            }
        }
        self.embedded.fetch_add(count, Ordering::SeqCst);
        Ok(())
    }

    /// Seed with the text hash, rehash once per dimension, then L2-normalize.
    fn hash_to_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            let value = (hash as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);

            let mut h = DefaultHasher::new();
            hash.hash(&mut h);
            hash = h.finish();
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.reserve(1)?;
        Ok(self.hash_to_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.reserve(texts.len())?;
        Ok(texts.iter().map(|t| self.hash_to_embedding(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-hash-embedding"
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }
}
