//! CSV → graph loading
//!
//! Walks the load tables in [`crate::catalog`] in order. File-backed nodes
//! first, then derived nodes; file-backed relationships, then derived
//! relationships and the milestone chain.

use super::batch::{run_in_batches, DEFAULT_BATCH_SIZE};
use crate::catalog::{DERIVED, MILESTONE_CHAIN, NODE_TABLES, RELATIONSHIP_TABLES};
use crate::ingest::read_table;
use crate::neo4j::GraphStore;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Rows read and batches written for one load table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub name: &'static str,
    pub file: &'static str,
    pub rows: usize,
    pub batches: usize,
}

/// Result of a load stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<TableLoad>,
    /// Derived node label → distinct values found
    pub derived: Vec<(&'static str, i64)>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

pub struct GraphLoader<'a> {
    store: &'a dyn GraphStore,
    data_dir: PathBuf,
    batch_size: usize,
}

impl<'a> GraphLoader<'a> {
    pub fn new(store: &'a dyn GraphStore, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Load every node table, then create the derived nodes.
    pub async fn load_nodes(&self) -> Result<LoadSummary> {
        let store = self.store;
        let mut summary = LoadSummary::default();

        for spec in NODE_TABLES {
            info!("Loading {} nodes from {}", spec.label, spec.file);
            let rows = read_table(&self.data_dir, spec.file)?;
            let batches = run_in_batches(&rows, self.batch_size, spec.label, |batch| {
                store.merge_nodes(spec, batch)
            })
            .await?;
            info!("Loaded {} {} nodes", rows.len(), spec.label);
            summary.tables.push(TableLoad {
                name: spec.label,
                file: spec.file,
                rows: rows.len(),
                batches,
            });
        }

        for spec in DERIVED {
            let created = store.derive_nodes(spec).await?;
            info!(
                "Created {} {} nodes (from {}.{})",
                created, spec.label, spec.source_label, spec.source_property
            );
            summary.derived.push((spec.label, created));
        }

        Ok(summary)
    }

    /// Load every relationship table, then the derived relationships.
    ///
    /// Rows whose endpoints were never loaded are skipped by the store.
    pub async fn load_relationships(&self) -> Result<LoadSummary> {
        let store = self.store;
        let mut summary = LoadSummary::default();

        for spec in RELATIONSHIP_TABLES {
            info!(
                "Loading {} relationships ({} -> {}) from {}",
                spec.rel_type, spec.from.label, spec.to.label, spec.file
            );
            let rows = read_table(&self.data_dir, spec.file)?;
            let batches = run_in_batches(&rows, self.batch_size, spec.rel_type, |batch| {
                store.merge_relationships(spec, batch)
            })
            .await?;
            info!("Loaded {} {} rows", rows.len(), spec.rel_type);
            summary.tables.push(TableLoad {
                name: spec.rel_type,
                file: spec.file,
                rows: rows.len(),
                batches,
            });
        }

        for spec in DERIVED {
            store.link_derived(spec).await?;
            info!(
                "Created {} -> {} {} relationships",
                spec.source_label, spec.label, spec.rel_type
            );
        }

        store.link_chain(&MILESTONE_CHAIN).await?;
        info!(
            "Created {} {} chain ordered by {}",
            MILESTONE_CHAIN.label, MILESTONE_CHAIN.rel_type, MILESTONE_CHAIN.order_by
        );

        Ok(summary)
    }
}
