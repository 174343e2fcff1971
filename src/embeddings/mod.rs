//! Embedding generation module
//!
//! Provides vector embeddings for Requirement and Defect descriptions and
//! for the fixed texts of the semantic test queries.
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `EmbeddingProvider` trait: async interface for embedding generation
//! - `HttpEmbeddingProvider`: Bedrock Titan or any OpenAI-compatible API
//! - `MockEmbeddingProvider`: deterministic mock for tests

pub mod mock;
pub mod provider;
pub mod traits;

pub use mock::MockEmbeddingProvider;
pub use provider::{EmbeddingApi, HttpEmbeddingProvider};
pub use traits::EmbeddingProvider;
