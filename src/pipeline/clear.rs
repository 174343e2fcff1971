//! Bulk deletion of the whole graph

use crate::neo4j::GraphStore;
use anyhow::Result;
use tracing::{debug, info};

/// Nodes detach-deleted per round, to keep each transaction small.
pub const CLEAR_BATCH_SIZE: i64 = 500;

/// Delete every node and relationship. Returns the number of nodes deleted.
pub async fn clear_database(store: &dyn GraphStore) -> Result<u64> {
    info!("Clearing database");
    let mut deleted_total: u64 = 0;
    loop {
        let deleted = store.delete_batch(CLEAR_BATCH_SIZE).await?;
        if deleted <= 0 {
            break;
        }
        deleted_total += deleted as u64;
        debug!("Deleted {} nodes so far", deleted_total);
    }
    info!("Database cleared ({} nodes deleted)", deleted_total);
    Ok(deleted_total)
}
