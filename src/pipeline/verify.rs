//! Post-load verification: node counts per label and total relationships

use crate::catalog::node_labels;
use crate::neo4j::{GraphStore, LabelCount};
use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Every known label, ordered by count descending
    pub counts: Vec<LabelCount>,
    pub relationships: i64,
}

impl VerifyReport {
    /// Labels with at least one node, in report order.
    pub fn itemized(&self) -> impl Iterator<Item = &LabelCount> {
        self.counts.iter().filter(|c| c.count > 0)
    }

    pub fn total_nodes(&self) -> i64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn count(&self, label: &str) -> i64 {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.count)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Node Counts:")?;
        for c in self.itemized() {
            writeln!(f, "  {}: {}", c.label, c.count)?;
        }
        writeln!(f, "  ---------------------")?;
        writeln!(f, "  Total Nodes: {}", self.total_nodes())?;
        writeln!(f)?;
        writeln!(f, "Total Relationships: {}", self.relationships)?;
        write!(f, "{}", rule)
    }
}

pub async fn verify(store: &dyn GraphStore) -> Result<VerifyReport> {
    let counts = store.label_counts(&node_labels()).await?;
    let relationships = store.relationship_count().await?;
    Ok(VerifyReport {
        counts,
        relationships,
    })
}
