//! Declarative descriptions of what gets written to the graph.
//!
//! Load tables, derived entities, schema objects and embedding targets are all
//! plain data. The Cypher for each is generated in [`super::cypher`] and the
//! same records drive the in-memory mock, so both backends agree on semantics.

use std::collections::HashMap;

/// One CSV row: trimmed header name → trimmed value.
pub type CsvRow = HashMap<String, String>;

/// How a CSV string is converted before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    /// `toFloat()` — unparseable values become null
    Float,
}

/// Maps a CSV column onto a graph property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMapping {
    pub property: &'static str,
    pub column: &'static str,
    pub kind: ValueKind,
}

impl PropertyMapping {
    pub const fn text(property: &'static str, column: &'static str) -> Self {
        Self {
            property,
            column,
            kind: ValueKind::Text,
        }
    }

    pub const fn float(property: &'static str, column: &'static str) -> Self {
        Self {
            property,
            column,
            kind: ValueKind::Float,
        }
    }
}

/// A file-backed node type: MERGE on `key`, then SET `properties`.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
    pub label: &'static str,
    pub file: &'static str,
    pub key: PropertyMapping,
    pub properties: &'static [PropertyMapping],
}

/// One side of a relationship row, matched by its unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub label: &'static str,
    pub key: &'static str,
    pub column: &'static str,
}

/// A file-backed relationship type. Both endpoints are MATCHed, the edge is MERGEd.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipSpec {
    pub rel_type: &'static str,
    pub file: &'static str,
    pub from: Endpoint,
    pub to: Endpoint,
    pub properties: &'static [PropertyMapping],
}

/// A node type with no source file, one node per distinct non-empty value of
/// `source_label.source_property`, linked back to its sources by `rel_type`.
#[derive(Debug, Clone, Copy)]
pub struct DerivedSpec {
    pub label: &'static str,
    pub key: &'static str,
    pub source_label: &'static str,
    pub source_property: &'static str,
    pub rel_type: &'static str,
}

/// Links every node of `label` to its successor in `order_by` order.
#[derive(Debug, Clone, Copy)]
pub struct ChainSpec {
    pub label: &'static str,
    pub order_by: &'static str,
    pub rel_type: &'static str,
}

/// Uniqueness constraint or scalar property index on `label.property`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRef {
    pub label: &'static str,
    pub property: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorIndexSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub property: &'static str,
}

/// Nodes whose `text_property` should be embedded into `embedding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingTarget {
    pub label: &'static str,
    pub id_property: &'static str,
    pub text_property: &'static str,
}

/// A node still waiting for its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingText {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingUpdate {
    pub id: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Parameter value for ad-hoc read queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Int(i64),
    Text(String),
    Vector(Vec<f32>),
}
