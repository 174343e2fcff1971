//! Neo4j client for populating the manufacturing knowledge graph

use super::cypher;
use super::models::*;
use crate::error::PipelineError;
use anyhow::{Context, Result};
use neo4rs::{query, BoltType, Graph, Query};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Client for Neo4j operations
///
/// Holds the single connection pool used by a pipeline run. Dropping the
/// client releases the connection, whichever way the run ends.
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

fn embedding_to_bolt(embedding: &[f32]) -> BoltType {
    let values: Vec<f64> = embedding.iter().map(|&x| x as f64).collect();
    values.into()
}

fn bind(mut q: Query, params: &[(&str, QueryParam)]) -> Query {
    for (key, value) in params {
        q = match value {
            QueryParam::Int(v) => q.param(key, *v),
            QueryParam::Text(v) => q.param(key, v.clone()),
            QueryParam::Vector(v) => q.param(key, embedding_to_bolt(v)),
        };
    }
    q
}

impl Neo4jClient {
    /// Connect and verify the server answers before any stage runs.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, PipelineError> {
        let attempt = async {
            let graph = Graph::new(uri, user, password)
                .await
                .context("Failed to create Neo4j driver")?;
            let mut check = graph
                .execute(query("RETURN 1 AS ok"))
                .await
                .context("Connectivity check failed")?;
            check.next().await.context("Connectivity check failed")?;
            Ok::<_, anyhow::Error>(graph)
        };

        match attempt.await {
            Ok(graph) => Ok(Self {
                graph: Arc::new(graph),
            }),
            Err(source) => Err(PipelineError::Connection {
                uri: uri.to_string(),
                source,
            }),
        }
    }

    /// Execute a parameterized Cypher query and collect every row
    async fn execute_with_params(&self, q: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    // ========================================================================
    // Schema
    // ========================================================================

    pub async fn run_statement(&self, cypher: &str) -> Result<()> {
        self.graph
            .run(query(cypher))
            .await
            .with_context(|| format!("Schema statement failed: {}", cypher))
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub async fn merge_nodes(&self, spec: &NodeSpec, batch: &[CsvRow]) -> Result<()> {
        let q = query(&cypher::node_upsert(spec)).param("batch", batch.to_vec());
        self.graph
            .run(q)
            .await
            .with_context(|| format!("Failed to merge {} nodes from {}", spec.label, spec.file))
    }

    pub async fn merge_relationships(
        &self,
        spec: &RelationshipSpec,
        batch: &[CsvRow],
    ) -> Result<()> {
        let q = query(&cypher::relationship_upsert(spec)).param("batch", batch.to_vec());
        self.graph.run(q).await.with_context(|| {
            format!(
                "Failed to merge {} relationships from {}",
                spec.rel_type, spec.file
            )
        })
    }

    pub async fn derive_nodes(&self, spec: &DerivedSpec) -> Result<i64> {
        let rows = self
            .execute_with_params(query(&cypher::derive_nodes(spec)))
            .await
            .with_context(|| format!("Failed to derive {} nodes", spec.label))?;
        match rows.first() {
            Some(row) => Ok(row.get::<i64>("created")?),
            None => Ok(0),
        }
    }

    pub async fn link_derived(&self, spec: &DerivedSpec) -> Result<()> {
        self.graph
            .run(query(&cypher::derive_links(spec)))
            .await
            .with_context(|| {
                format!(
                    "Failed to link {} -> {} ({})",
                    spec.source_label, spec.label, spec.rel_type
                )
            })
    }

    pub async fn link_chain(&self, spec: &ChainSpec) -> Result<()> {
        self.graph
            .run(query(&cypher::chain(spec)))
            .await
            .with_context(|| format!("Failed to build {} {} chain", spec.label, spec.rel_type))
    }

    // ========================================================================
    // Embeddings
    // ========================================================================

    pub async fn pending_embeddings(&self, target: &EmbeddingTarget) -> Result<Vec<PendingText>> {
        let rows = self
            .execute_with_params(query(&cypher::pending_embeddings(target)))
            .await
            .with_context(|| format!("Failed to fetch {} nodes to embed", target.label))?;

        let mut pending = Vec::with_capacity(rows.len());
        for row in rows {
            pending.push(PendingText {
                id: row.get("id")?,
                text: row.get("text")?,
            });
        }
        Ok(pending)
    }

    pub async fn store_embeddings(
        &self,
        target: &EmbeddingTarget,
        batch: &[EmbeddingUpdate],
    ) -> Result<()> {
        let rows: Vec<HashMap<String, BoltType>> = batch
            .iter()
            .map(|update| {
                let mut m: HashMap<String, BoltType> = HashMap::new();
                m.insert("id".to_string(), update.id.clone().into());
                m.insert("embedding".to_string(), embedding_to_bolt(&update.embedding));
                m
            })
            .collect();

        let q = query(&cypher::store_embeddings(target)).param("batch", rows);
        self.graph
            .run(q)
            .await
            .with_context(|| format!("Failed to store {} embeddings", target.label))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    pub async fn label_counts(&self, labels: &[&str]) -> Result<Vec<LabelCount>> {
        let rows = self
            .execute_with_params(query(&cypher::label_counts(labels)))
            .await
            .context("Failed to count nodes")?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            counts.push(LabelCount {
                label: row.get("label")?,
                count: row.get("count")?,
            });
        }
        Ok(counts)
    }

    pub async fn relationship_count(&self) -> Result<i64> {
        let rows = self
            .execute_with_params(query(cypher::RELATIONSHIP_COUNT))
            .await
            .context("Failed to count relationships")?;
        match rows.first() {
            Some(row) => Ok(row.get::<i64>("count")?),
            None => Ok(0),
        }
    }

    pub async fn delete_batch(&self, limit: i64) -> Result<i64> {
        let rows = self
            .execute_with_params(query(cypher::DELETE_BATCH).param("limit", limit))
            .await
            .context("Failed to delete nodes")?;
        match rows.first() {
            Some(row) => Ok(row.get::<i64>("deleted")?),
            None => Ok(0),
        }
    }

    // ========================================================================
    // Read queries
    // ========================================================================

    pub async fn fetch_rows(
        &self,
        cypher: &str,
        params: &[(&str, QueryParam)],
        columns: &[&str],
    ) -> Result<Vec<Vec<Value>>> {
        let rows = self.execute_with_params(bind(query(cypher), params)).await?;

        let mut table = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cells = Vec::with_capacity(columns.len());
            for column in columns {
                let cell: Value = row
                    .get(column)
                    .with_context(|| format!("Cannot read column '{}'", column))?;
                cells.push(cell);
            }
            table.push(cells);
        }
        Ok(table)
    }
}
