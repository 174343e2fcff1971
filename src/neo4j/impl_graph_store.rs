//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;
use serde_json::Value;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn run_statement(&self, cypher: &str) -> anyhow::Result<()> {
        self.run_statement(cypher).await
    }

    async fn merge_nodes(&self, spec: &NodeSpec, batch: &[CsvRow]) -> anyhow::Result<()> {
        self.merge_nodes(spec, batch).await
    }

    async fn merge_relationships(
        &self,
        spec: &RelationshipSpec,
        batch: &[CsvRow],
    ) -> anyhow::Result<()> {
        self.merge_relationships(spec, batch).await
    }

    async fn derive_nodes(&self, spec: &DerivedSpec) -> anyhow::Result<i64> {
        self.derive_nodes(spec).await
    }

    async fn link_derived(&self, spec: &DerivedSpec) -> anyhow::Result<()> {
        self.link_derived(spec).await
    }

    async fn link_chain(&self, spec: &ChainSpec) -> anyhow::Result<()> {
        self.link_chain(spec).await
    }

    async fn pending_embeddings(
        &self,
        target: &EmbeddingTarget,
    ) -> anyhow::Result<Vec<PendingText>> {
        self.pending_embeddings(target).await
    }

    async fn store_embeddings(
        &self,
        target: &EmbeddingTarget,
        batch: &[EmbeddingUpdate],
    ) -> anyhow::Result<()> {
        self.store_embeddings(target, batch).await
    }

    async fn label_counts(&self, labels: &[&str]) -> anyhow::Result<Vec<LabelCount>> {
        self.label_counts(labels).await
    }

    async fn relationship_count(&self) -> anyhow::Result<i64> {
        self.relationship_count().await
    }

    async fn delete_batch(&self, limit: i64) -> anyhow::Result<i64> {
        self.delete_batch(limit).await
    }

    async fn fetch_rows(
        &self,
        cypher: &str,
        params: &[(&str, QueryParam)],
        columns: &[&str],
    ) -> anyhow::Result<Vec<Vec<Value>>> {
        self.fetch_rows(cypher, params, columns).await
    }
}
