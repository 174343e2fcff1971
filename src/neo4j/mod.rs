//! Neo4j client, declarative models and the graph store abstraction

pub mod client;
pub mod cypher;
mod impl_graph_store;
pub mod models;
pub mod traits;

pub use client::Neo4jClient;
pub use models::*;
pub use traits::GraphStore;

#[cfg(test)]
pub(crate) mod mock;
