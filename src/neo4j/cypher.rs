//! Cypher text generated from the declarative models.
//!
//! Labels, relationship types and property names come from static tables in
//! [`crate::catalog`] and are interpolated directly. Row values are always
//! bound through `$batch`.

use super::models::*;

/// Single-quote a CSV column name for use as `row['...']`.
fn quote(column: &str) -> String {
    format!("'{}'", column.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn value_expr(mapping: &PropertyMapping) -> String {
    let raw = format!("row[{}]", quote(mapping.column));
    match mapping.kind {
        ValueKind::Text => raw,
        ValueKind::Float => format!("toFloat({})", raw),
    }
}

fn set_clause(var: &str, properties: &[PropertyMapping]) -> String {
    if properties.is_empty() {
        return String::new();
    }
    let assignments: Vec<String> = properties
        .iter()
        .map(|p| format!("{}.{} = {}", var, p.property, value_expr(p)))
        .collect();
    format!("\nSET {}", assignments.join(",\n    "))
}

/// `UNWIND $batch AS row MERGE (n:Label {key: row[...]}) SET ...`
pub fn node_upsert(spec: &NodeSpec) -> String {
    format!(
        "UNWIND $batch AS row\nMERGE (n:{} {{{}: {}}}){}",
        spec.label,
        spec.key.property,
        value_expr(&spec.key),
        set_clause("n", spec.properties)
    )
}

/// MATCH both endpoints by key, MERGE the edge, SET edge properties.
pub fn relationship_upsert(spec: &RelationshipSpec) -> String {
    let edge = if spec.properties.is_empty() {
        format!("[:{}]", spec.rel_type)
    } else {
        format!("[rel:{}]", spec.rel_type)
    };
    format!(
        "UNWIND $batch AS row\n\
         MATCH (a:{} {{{}: row[{}]}})\n\
         MATCH (b:{} {{{}: row[{}]}})\n\
         MERGE (a)-{}->(b){}",
        spec.from.label,
        spec.from.key,
        quote(spec.from.column),
        spec.to.label,
        spec.to.key,
        quote(spec.to.column),
        edge,
        set_clause("rel", spec.properties)
    )
}

/// One node per distinct non-empty source value; returns `created`.
pub fn derive_nodes(spec: &DerivedSpec) -> String {
    format!(
        "MATCH (src:{src})\n\
         WHERE src.{prop} IS NOT NULL AND src.{prop} <> ''\n\
         WITH DISTINCT src.{prop} AS value\n\
         MERGE (d:{label} {{{key}: value}})\n\
         RETURN count(d) AS created",
        src = spec.source_label,
        prop = spec.source_property,
        label = spec.label,
        key = spec.key,
    )
}

/// Link each source node to the derived node carrying its value.
pub fn derive_links(spec: &DerivedSpec) -> String {
    format!(
        "MATCH (src:{src})\n\
         WHERE src.{prop} IS NOT NULL AND src.{prop} <> ''\n\
         MATCH (d:{label} {{{key}: src.{prop}}})\n\
         MERGE (src)-[:{rel}]->(d)",
        src = spec.source_label,
        prop = spec.source_property,
        label = spec.label,
        key = spec.key,
        rel = spec.rel_type,
    )
}

/// Consecutive pairs in `order_by` order get a `rel_type` edge.
pub fn chain(spec: &ChainSpec) -> String {
    format!(
        "MATCH (m:{label})\n\
         WHERE m.{order} IS NOT NULL\n\
         WITH m ORDER BY m.{order}\n\
         WITH collect(m) AS chain\n\
         UNWIND range(0, size(chain) - 2) AS i\n\
         WITH chain[i] AS current, chain[i + 1] AS next\n\
         MERGE (current)-[:{rel}]->(next)",
        label = spec.label,
        order = spec.order_by,
        rel = spec.rel_type,
    )
}

pub fn pending_embeddings(target: &EmbeddingTarget) -> String {
    format!(
        "MATCH (n:{label})\n\
         WHERE n.{text} IS NOT NULL AND n.{text} <> ''\n\
         AND n.embedding IS NULL\n\
         RETURN n.{id} AS id, n.{text} AS text",
        label = target.label,
        text = target.text_property,
        id = target.id_property,
    )
}

pub fn store_embeddings(target: &EmbeddingTarget) -> String {
    format!(
        "UNWIND $batch AS row\n\
         MATCH (n:{} {{{}: row.id}})\n\
         SET n.embedding = row.embedding",
        target.label, target.id_property
    )
}

pub fn unique_constraint(c: &PropertyRef) -> String {
    format!(
        "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
        c.label, c.property
    )
}

pub fn property_index_name(index: &PropertyRef) -> String {
    format!(
        "idx_{}_{}",
        index.label.to_lowercase(),
        index.property.to_lowercase()
    )
}

pub fn property_index(index: &PropertyRef) -> String {
    format!(
        "CREATE INDEX {} IF NOT EXISTS FOR (n:{}) ON (n.{})",
        property_index_name(index),
        index.label,
        index.property
    )
}

pub fn vector_index(index: &VectorIndexSpec, dimensions: usize) -> String {
    format!(
        "CREATE VECTOR INDEX {} IF NOT EXISTS\n\
         FOR (n:{}) ON (n.{})\n\
         OPTIONS {{indexConfig: {{\n\
         \x20   `vector.dimensions`: {},\n\
         \x20   `vector.similarity_function`: 'cosine'\n\
         }}}}",
        index.name, index.label, index.property, dimensions
    )
}

/// One UNION ALL subquery returning `label, count` for every label.
pub fn label_counts(labels: &[&str]) -> String {
    let unions: Vec<String> = labels
        .iter()
        .map(|label| {
            format!(
                "MATCH (n:{0}) RETURN '{0}' AS label, count(n) AS count",
                label
            )
        })
        .collect();
    format!(
        "CALL () {{ {} }} RETURN label, count ORDER BY count DESC",
        unions.join(" UNION ALL ")
    )
}

pub const RELATIONSHIP_COUNT: &str = "MATCH ()-[r]->() RETURN count(r) AS count";

pub const DELETE_BATCH: &str =
    "MATCH (n) WITH n LIMIT $limit DETACH DELETE n RETURN count(*) AS deleted";
