//! Constraints and indexes
//!
//! Every statement is `IF NOT EXISTS`, so each stage can be re-run.

use crate::catalog::{CONSTRAINTS, PROPERTY_INDEXES, VECTOR_INDEXES};
use crate::neo4j::{cypher, GraphStore};
use anyhow::Result;
use tracing::info;

/// One uniqueness constraint per entity key.
pub async fn create_constraints(store: &dyn GraphStore) -> Result<()> {
    for constraint in CONSTRAINTS {
        store
            .run_statement(&cypher::unique_constraint(constraint))
            .await?;
        info!("Constraint: {}.{}", constraint.label, constraint.property);
    }
    Ok(())
}

pub async fn create_indexes(store: &dyn GraphStore) -> Result<()> {
    for index in PROPERTY_INDEXES {
        store.run_statement(&cypher::property_index(index)).await?;
        info!(
            "Index: {} on {}.{}",
            cypher::property_index_name(index),
            index.label,
            index.property
        );
    }
    Ok(())
}

/// Cosine vector indexes sized to the embedding provider's dimension.
pub async fn create_vector_indexes(store: &dyn GraphStore, dimensions: usize) -> Result<()> {
    for index in VECTOR_INDEXES {
        store
            .run_statement(&cypher::vector_index(index, dimensions))
            .await?;
        info!(
            "Vector index: {} on {}.{} ({} dims)",
            index.name, index.label, index.property, dimensions
        );
    }
    Ok(())
}
