//! Read-only query catalog
//!
//! Sample queries and semantic/hybrid test queries are declarative records
//! executed by one runner and rendered as tables.

pub mod formatting;
pub mod samples;
pub mod semantic;

use crate::neo4j::{GraphStore, QueryParam};
use anyhow::Result;
use serde_json::Value;

/// How a returned column is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Plain value, truncated to the given length (0 = column width only)
    Text(usize),
    /// Similarity score, four decimals
    Score,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
    pub cell: Cell,
}

impl Column {
    pub const fn text(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key,
            cell: Cell::Text(0),
        }
    }

    pub const fn truncated(header: &'static str, key: &'static str, max_len: usize) -> Self {
        Self {
            header,
            key,
            cell: Cell::Text(max_len),
        }
    }

    pub const fn score(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key,
            cell: Cell::Score,
        }
    }

    fn render(&self, value: &Value) -> String {
        match self.cell {
            Cell::Text(max_len) => formatting::val(value, max_len),
            Cell::Score => formatting::score(value),
        }
    }
}

/// A titled, described Cypher query and the columns it displays.
#[derive(Debug, Clone, Copy)]
pub struct CatalogQuery {
    pub title: &'static str,
    pub description: &'static str,
    pub cypher: &'static str,
    pub columns: &'static [Column],
    /// Printed instead of an empty table
    pub empty_message: &'static str,
}

impl CatalogQuery {
    pub fn column_keys(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.key).collect()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }
}

/// Run `query` and render its rows (without the section header).
pub async fn run_query(
    store: &dyn GraphStore,
    query: &CatalogQuery,
    params: &[(&str, QueryParam)],
) -> Result<String> {
    let rows = store
        .fetch_rows(query.cypher, params, &query.column_keys())
        .await?;
    Ok(render_rows(query, &rows))
}

pub fn render_rows(query: &CatalogQuery, rows: &[Vec<Value>]) -> String {
    if rows.is_empty() {
        return format!("  {}\n\n", query.empty_message);
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            query
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| column.render(value))
                .collect()
        })
        .collect();
    formatting::table(&query.headers(), &cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const QUERY: CatalogQuery = CatalogQuery {
        title: "Test",
        description: "A test query",
        cypher: "RETURN 1",
        columns: &[
            Column::score("Score", "score"),
            Column::truncated("Name", "name", 6),
        ],
        empty_message: "(nothing here)",
    };

    #[test]
    fn test_render_rows_applies_column_formats() {
        let rows = vec![vec![json!(0.87654), json!("Battery cooling")]];
        let out = render_rows(&QUERY, &rows);
        assert!(out.contains("0.8765"));
        assert!(out.contains("Batte\u{2026}"));
    }

    #[test]
    fn test_render_rows_empty_message() {
        assert_eq!(render_rows(&QUERY, &[]), "  (nothing here)\n\n");
    }
}
