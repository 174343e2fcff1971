//! In-memory mock implementation of GraphStore for testing.
//!
//! Reproduces the database-side semantics the pipeline depends on: MERGE
//! upserts keyed by each label's identifier, MATCH-or-skip for relationship
//! endpoints, distinct-value derivation and ordered chaining.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

/// (label, identifier value)
pub type NodeKey = (String, String);

type EdgeKey = (String, NodeKey, NodeKey);

#[derive(Default)]
struct MockGraph {
    nodes: BTreeMap<NodeKey, BTreeMap<String, Value>>,
    edges: BTreeMap<EdgeKey, BTreeMap<String, Value>>,
    embeddings: BTreeMap<NodeKey, Vec<f32>>,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    graph: RwLock<MockGraph>,
    /// Every schema statement received, in order
    pub statements: RwLock<Vec<String>>,
    /// (label or relationship type, batch length) per write call
    pub write_calls: RwLock<Vec<(String, usize)>>,
    /// Read queries: substring of the Cypher → canned rows, or `None` to fail
    canned_reads: RwLock<Vec<(String, Option<Vec<Vec<Value>>>)>>,
}

fn stored_value(mapping: &PropertyMapping, row: &CsvRow) -> Option<Value> {
    let raw = row.get(mapping.column)?;
    match mapping.kind {
        ValueKind::Text => Some(Value::String(raw.clone())),
        ValueKind::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
    }
}

fn apply(props: &mut BTreeMap<String, Value>, mappings: &[PropertyMapping], row: &CsvRow) {
    for mapping in mappings {
        match stored_value(mapping, row) {
            Some(value) => {
                props.insert(mapping.property.to_string(), value);
            }
            // SET n.x = null removes the property
            None => {
                props.remove(mapping.property);
            }
        }
    }
}

fn non_empty_str(props: &BTreeMap<String, Value>, property: &str) -> Option<String> {
    match props.get(property) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(MockGraph::default()),
            statements: RwLock::new(Vec::new()),
            write_calls: RwLock::new(Vec::new()),
            canned_reads: RwLock::new(Vec::new()),
        }
    }

    /// Answer read queries containing `fragment` with `rows`.
    pub async fn with_rows(self, fragment: &str, rows: Vec<Vec<Value>>) -> Self {
        self.canned_reads
            .write()
            .await
            .push((fragment.to_string(), Some(rows)));
        self
    }

    /// Fail read queries containing `fragment`.
    pub async fn failing_read(self, fragment: &str) -> Self {
        self.canned_reads
            .write()
            .await
            .push((fragment.to_string(), None));
        self
    }

    /// Insert a node directly, bypassing the load tables.
    pub async fn seed_node(&self, label: &str, key: &str, props: &[(&str, Value)]) {
        let mut graph = self.graph.write().await;
        let entry = graph
            .nodes
            .entry((label.to_string(), key.to_string()))
            .or_default();
        for (name, value) in props {
            entry.insert(name.to_string(), value.clone());
        }
    }

    pub async fn node_count(&self, label: &str) -> usize {
        let graph = self.graph.read().await;
        graph.nodes.keys().filter(|(l, _)| l == label).count()
    }

    /// Identifiers of every node with `label`, sorted.
    pub async fn node_keys(&self, label: &str) -> Vec<String> {
        let graph = self.graph.read().await;
        graph
            .nodes
            .keys()
            .filter(|(l, _)| l == label)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub async fn node_property(&self, label: &str, key: &str, property: &str) -> Option<Value> {
        let graph = self.graph.read().await;
        graph
            .nodes
            .get(&(label.to_string(), key.to_string()))
            .and_then(|props| props.get(property).cloned())
    }

    /// (from key, to key) of every edge of `rel_type`, sorted.
    pub async fn edges(&self, rel_type: &str) -> Vec<(String, String)> {
        let graph = self.graph.read().await;
        graph
            .edges
            .keys()
            .filter(|(t, _, _)| t == rel_type)
            .map(|(_, from, to)| (from.1.clone(), to.1.clone()))
            .collect()
    }

    pub async fn edge_property(
        &self,
        rel_type: &str,
        from: &str,
        to: &str,
        property: &str,
    ) -> Option<Value> {
        let graph = self.graph.read().await;
        graph
            .edges
            .iter()
            .find(|((t, f, d), _)| t == rel_type && f.1 == from && d.1 == to)
            .and_then(|(_, props)| props.get(property).cloned())
    }

    pub async fn embedding(&self, label: &str, key: &str) -> Option<Vec<f32>> {
        let graph = self.graph.read().await;
        graph
            .embeddings
            .get(&(label.to_string(), key.to_string()))
            .cloned()
    }

    async fn record_write(&self, name: &str, len: usize) {
        self.write_calls.write().await.push((name.to_string(), len));
    }
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn run_statement(&self, cypher: &str) -> Result<()> {
        self.statements.write().await.push(cypher.to_string());
        Ok(())
    }

    async fn merge_nodes(&self, spec: &NodeSpec, batch: &[CsvRow]) -> Result<()> {
        self.record_write(spec.label, batch.len()).await;
        let mut graph = self.graph.write().await;
        for row in batch {
            let Some(key) = row.get(spec.key.column) else {
                bail!(
                    "Cannot merge {} node using null property value for {}",
                    spec.label,
                    spec.key.property
                );
            };
            let props = graph
                .nodes
                .entry((spec.label.to_string(), key.clone()))
                .or_default();
            props.insert(spec.key.property.to_string(), Value::String(key.clone()));
            apply(props, spec.properties, row);
        }
        Ok(())
    }

    async fn merge_relationships(
        &self,
        spec: &RelationshipSpec,
        batch: &[CsvRow],
    ) -> Result<()> {
        self.record_write(spec.rel_type, batch.len()).await;
        let mut graph = self.graph.write().await;
        for row in batch {
            let (Some(from), Some(to)) = (row.get(spec.from.column), row.get(spec.to.column))
            else {
                continue;
            };
            let from = (spec.from.label.to_string(), from.clone());
            let to = (spec.to.label.to_string(), to.clone());
            if !graph.nodes.contains_key(&from) || !graph.nodes.contains_key(&to) {
                continue;
            }
            let props = graph
                .edges
                .entry((spec.rel_type.to_string(), from, to))
                .or_default();
            apply(props, spec.properties, row);
        }
        Ok(())
    }

    async fn derive_nodes(&self, spec: &DerivedSpec) -> Result<i64> {
        let mut graph = self.graph.write().await;
        let values: BTreeSet<String> = graph
            .nodes
            .iter()
            .filter(|((label, _), _)| label == spec.source_label)
            .filter_map(|(_, props)| non_empty_str(props, spec.source_property))
            .collect();
        for value in &values {
            graph
                .nodes
                .entry((spec.label.to_string(), value.clone()))
                .or_default()
                .insert(spec.key.to_string(), Value::String(value.clone()));
        }
        Ok(values.len() as i64)
    }

    async fn link_derived(&self, spec: &DerivedSpec) -> Result<()> {
        let mut graph = self.graph.write().await;
        let links: Vec<(NodeKey, NodeKey)> = graph
            .nodes
            .iter()
            .filter(|((label, _), _)| label == spec.source_label)
            .filter_map(|(key, props)| {
                non_empty_str(props, spec.source_property)
                    .map(|value| (key.clone(), (spec.label.to_string(), value)))
            })
            .filter(|(_, target)| graph.nodes.contains_key(target))
            .collect();
        for (from, to) in links {
            graph
                .edges
                .entry((spec.rel_type.to_string(), from, to))
                .or_default();
        }
        Ok(())
    }

    async fn link_chain(&self, spec: &ChainSpec) -> Result<()> {
        let mut graph = self.graph.write().await;
        let mut ordered: Vec<(String, NodeKey)> = graph
            .nodes
            .iter()
            .filter(|((label, _), _)| label == spec.label)
            .filter_map(|(key, props)| match props.get(spec.order_by) {
                Some(Value::String(s)) => Some((s.clone(), key.clone())),
                _ => None,
            })
            .collect();
        ordered.sort();
        for pair in ordered.windows(2) {
            graph
                .edges
                .entry((spec.rel_type.to_string(), pair[0].1.clone(), pair[1].1.clone()))
                .or_default();
        }
        Ok(())
    }

    async fn pending_embeddings(&self, target: &EmbeddingTarget) -> Result<Vec<PendingText>> {
        let graph = self.graph.read().await;
        Ok(graph
            .nodes
            .iter()
            .filter(|(key, _)| key.0 == target.label && !graph.embeddings.contains_key(*key))
            .filter_map(|(_, props)| {
                let text = non_empty_str(props, target.text_property)?;
                let id = non_empty_str(props, target.id_property)?;
                Some(PendingText { id, text })
            })
            .collect())
    }

    async fn store_embeddings(
        &self,
        target: &EmbeddingTarget,
        batch: &[EmbeddingUpdate],
    ) -> Result<()> {
        self.record_write(target.label, batch.len()).await;
        let mut graph = self.graph.write().await;
        for update in batch {
            let key = (target.label.to_string(), update.id.clone());
            if graph.nodes.contains_key(&key) {
                graph.embeddings.insert(key, update.embedding.clone());
            }
        }
        Ok(())
    }

    async fn label_counts(&self, labels: &[&str]) -> Result<Vec<LabelCount>> {
        let graph = self.graph.read().await;
        let mut counts: Vec<LabelCount> = labels
            .iter()
            .map(|label| LabelCount {
                label: label.to_string(),
                count: graph.nodes.keys().filter(|(l, _)| l == label).count() as i64,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    async fn relationship_count(&self) -> Result<i64> {
        Ok(self.graph.read().await.edges.len() as i64)
    }

    async fn delete_batch(&self, limit: i64) -> Result<i64> {
        let mut graph = self.graph.write().await;
        let doomed: Vec<NodeKey> = graph
            .nodes
            .keys()
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        for key in &doomed {
            graph.nodes.remove(key);
            graph.embeddings.remove(key);
        }
        graph
            .edges
            .retain(|(_, from, to), _| !doomed.contains(from) && !doomed.contains(to));
        Ok(doomed.len() as i64)
    }

    async fn fetch_rows(
        &self,
        cypher: &str,
        _params: &[(&str, QueryParam)],
        _columns: &[&str],
    ) -> Result<Vec<Vec<Value>>> {
        let canned = self.canned_reads.read().await;
        match canned.iter().find(|(fragment, _)| cypher.contains(fragment.as_str())) {
            Some((_, Some(rows))) => Ok(rows.clone()),
            Some((fragment, None)) => bail!("There is no such vector schema index: {}", fragment),
            None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_merge_nodes_upserts_by_key() {
        let store = MockGraphStore::new();
        let spec = catalog::node_table("Product").unwrap();
        let batch = vec![row(&[
            ("product_id", "p_1"),
            ("Product Name", "Old"),
            ("Description", "d"),
        ])];
        store.merge_nodes(spec, &batch).await.unwrap();
        let batch = vec![row(&[("product_id", "p_1"), ("Product Name", "New")])];
        store.merge_nodes(spec, &batch).await.unwrap();

        assert_eq!(store.node_count("Product").await, 1);
        assert_eq!(
            store.node_property("Product", "p_1", "name").await,
            Some(Value::String("New".into()))
        );
        // Missing column sets the property to null
        assert_eq!(store.node_property("Product", "p_1", "description").await, None);
    }

    #[tokio::test]
    async fn test_merge_nodes_rejects_missing_key() {
        let store = MockGraphStore::new();
        let spec = catalog::node_table("Product").unwrap();
        let err = store
            .merge_nodes(spec, &[row(&[("Product Name", "x")])])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("null property value"));
    }

    #[tokio::test]
    async fn test_relationship_skips_missing_endpoints() {
        let store = MockGraphStore::new();
        store.seed_node("TestCase", "tc_1", &[]).await;
        store.seed_node("Defect", "d_1", &[]).await;
        let spec = catalog::relationship_table("DETECTED").unwrap();
        let batch = vec![
            row(&[("test_case_id", "tc_1"), ("defect_id", "d_1")]),
            row(&[("test_case_id", "tc_1"), ("defect_id", "d_missing")]),
        ];
        store.merge_relationships(spec, &batch).await.unwrap();
        store.merge_relationships(spec, &batch).await.unwrap();
        assert_eq!(
            store.edges("DETECTED").await,
            vec![("tc_1".to_string(), "d_1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_batch_removes_attached_edges() {
        let store = MockGraphStore::new();
        store.seed_node("Milestone", "m_100", &[("milestone_id", "m_100".into())]).await;
        store.seed_node("Milestone", "m_200", &[("milestone_id", "m_200".into())]).await;
        store.link_chain(&catalog::MILESTONE_CHAIN).await.unwrap();
        assert_eq!(store.relationship_count().await.unwrap(), 1);

        assert_eq!(store.delete_batch(1).await.unwrap(), 1);
        assert_eq!(store.relationship_count().await.unwrap(), 0);
        assert_eq!(store.delete_batch(10).await.unwrap(), 1);
        assert_eq!(store.delete_batch(10).await.unwrap(), 0);
    }
}
