//! Incremental embedding backfill
//!
//! Only nodes without an `embedding` are selected, and each batch is written
//! as soon as it is embedded. A run that stops part-way keeps what it wrote
//! and the next run picks up the remainder.

use super::batch::run_in_batches;
use crate::catalog::EMBEDDING_TARGETS;
use crate::embeddings::EmbeddingProvider;
use crate::neo4j::{EmbeddingTarget, EmbeddingUpdate, GraphStore};
use anyhow::{ensure, Context, Result};
use std::time::Instant;
use tracing::info;

/// Embed every pending node of `target`. Returns how many were embedded.
pub async fn backfill(
    store: &dyn GraphStore,
    provider: &dyn EmbeddingProvider,
    target: &EmbeddingTarget,
) -> Result<usize> {
    let pending = store.pending_embeddings(target).await?;
    if pending.is_empty() {
        info!(
            "No {} nodes need embedding (already embedded or no text)",
            target.label
        );
        return Ok(0);
    }

    let total = pending.len();
    info!("Embedding {} {} descriptions", total, target.label);

    run_in_batches(&pending, provider.batch_size(), target.label, move |batch| async move {
        let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
        let embeddings = provider
            .embed_batch(&texts)
            .await
            .with_context(|| format!("Failed to embed {} descriptions", target.label))?;
        ensure!(
            embeddings.len() == batch.len(),
            "Provider returned {} embeddings for {} texts",
            embeddings.len(),
            batch.len()
        );

        let updates: Vec<EmbeddingUpdate> = batch
            .iter()
            .zip(embeddings)
            .map(|(p, embedding)| EmbeddingUpdate {
                id: p.id.clone(),
                embedding,
            })
            .collect();
        store.store_embeddings(target, &updates).await
    })
    .await?;

    info!("Embedded {} {} descriptions", total, target.label);
    Ok(total)
}

/// Backfill requirements, then defects. Returns the total embedded.
pub async fn embed_descriptions(
    store: &dyn GraphStore,
    provider: &dyn EmbeddingProvider,
) -> Result<usize> {
    info!("Using embedding model: {}", provider.model_name());
    let start = Instant::now();

    let mut total = 0;
    for target in EMBEDDING_TARGETS {
        total += backfill(store, provider, target).await?;
    }

    info!(
        "Embedding complete: {} nodes in {:.1}s",
        total,
        start.elapsed().as_secs_f64()
    );
    Ok(total)
}
