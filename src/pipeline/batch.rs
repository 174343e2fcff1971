//! Batched writes with progress reporting

use anyhow::{ensure, Result};
use std::future::Future;
use tracing::debug;

/// Rows per write for node and relationship loads.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Call `write` once per consecutive slice of at most `batch_size` records.
///
/// Stops at the first failing write; earlier batches stay committed.
/// Returns the number of write calls made.
pub async fn run_in_batches<'a, T, F, Fut>(
    records: &'a [T],
    batch_size: usize,
    label: &str,
    mut write: F,
) -> Result<usize>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    ensure!(batch_size > 0, "Batch size must be positive");

    let total = records.len();
    let mut calls = 0;
    for chunk in records.chunks(batch_size) {
        write(chunk).await?;
        calls += 1;

        let processed = (calls * batch_size).min(total);
        debug!("{} progress: {}/{} ({}%)", label, processed, total, 100 * processed / total);
    }
    Ok(calls)
}
