//! Load pipeline stages
//!
//! Schema, bulk load, embedding backfill, verification and clearing. Every
//! stage talks to the database through [`crate::neo4j::GraphStore`].

pub mod backfill;
pub mod batch;
pub mod clear;
pub mod loader;
pub mod schema;
pub mod verify;

pub use backfill::{backfill, embed_descriptions};
pub use batch::{run_in_batches, DEFAULT_BATCH_SIZE};
pub use clear::clear_database;
pub use loader::{GraphLoader, LoadSummary, TableLoad};
pub use schema::{create_constraints, create_indexes, create_vector_indexes};
pub use verify::{verify, VerifyReport};
