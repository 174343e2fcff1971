//! GraphStore trait definition
//!
//! The graph session the pipeline consumes. `Neo4jClient` implements it
//! against a live database; `MockGraphStore` implements the same MERGE
//! semantics in memory for tests.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Abstract interface for every graph operation the pipeline performs.
///
/// All writes are upserts: calling any write twice with the same input
/// leaves the graph unchanged the second time.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Schema
    // ========================================================================

    /// Run a schema statement (constraint / index DDL). Must be idempotent.
    async fn run_statement(&self, cypher: &str) -> Result<()>;

    // ========================================================================
    // Loading
    // ========================================================================

    /// Upsert one batch of nodes as a single write.
    async fn merge_nodes(&self, spec: &NodeSpec, batch: &[CsvRow]) -> Result<()>;

    /// Upsert one batch of relationships as a single write.
    ///
    /// Rows whose endpoints do not exist are skipped.
    async fn merge_relationships(&self, spec: &RelationshipSpec, batch: &[CsvRow]) -> Result<()>;

    /// Create the derived nodes for `spec`. Returns the number of distinct values.
    async fn derive_nodes(&self, spec: &DerivedSpec) -> Result<i64>;

    /// Link source nodes to their derived node.
    async fn link_derived(&self, spec: &DerivedSpec) -> Result<()>;

    /// Build the ordered chain described by `spec`.
    async fn link_chain(&self, spec: &ChainSpec) -> Result<()>;

    // ========================================================================
    // Embeddings
    // ========================================================================

    /// Nodes of `target.label` with non-empty text and no embedding yet.
    async fn pending_embeddings(&self, target: &EmbeddingTarget) -> Result<Vec<PendingText>>;

    /// Write one batch of embeddings as a single write.
    async fn store_embeddings(
        &self,
        target: &EmbeddingTarget,
        batch: &[EmbeddingUpdate],
    ) -> Result<()>;

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Node count per label, ordered by count descending.
    async fn label_counts(&self, labels: &[&str]) -> Result<Vec<LabelCount>>;

    async fn relationship_count(&self) -> Result<i64>;

    /// Detach-delete up to `limit` nodes. Returns how many were deleted.
    async fn delete_batch(&self, limit: i64) -> Result<i64>;

    // ========================================================================
    // Read queries
    // ========================================================================

    /// Run a read query and return the requested columns of every row.
    async fn fetch_rows(
        &self,
        cypher: &str,
        params: &[(&str, QueryParam)],
        columns: &[&str],
    ) -> Result<Vec<Vec<Value>>>;
}
