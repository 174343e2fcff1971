//! Test fixtures

use crate::neo4j::mock::MockGraphStore;
use crate::pipeline::GraphLoader;

#[path = "../tests/common/mod.rs"]
mod common;
pub use common::*;

/// A mock store with the whole fixture dataset loaded.
pub async fn loaded_store() -> MockGraphStore {
    let store = MockGraphStore::new();
    let loader = GraphLoader::new(&store, fixture_dir());
    loader.load_nodes().await.unwrap();
    loader.load_relationships().await.unwrap();
    store
}
