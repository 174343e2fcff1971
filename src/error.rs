//! Typed pipeline failures
//!
//! Most stage code propagates `anyhow::Error` with context. The variants here
//! are the failures an operator needs to tell apart at the top level.

use std::path::PathBuf;
use thiserror::Error;

/// URI scheme prefixes accepted for `NEO4J_URI`.
pub const VALID_URI_SCHEMES: &[&str] = &[
    "neo4j://",
    "neo4j+s://",
    "neo4j+ssc://",
    "bolt://",
    "bolt+s://",
    "bolt+ssc://",
];

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The database could not be reached or rejected the credentials.
    /// Format with `{:#}` (through anyhow) to include the cause chain.
    #[error("Cannot connect to {uri}")]
    Connection {
        uri: String,
        #[source]
        source: anyhow::Error,
    },

    /// A CSV file could not be decoded with any supported encoding.
    #[error("Cannot decode {} with {}", file.display(), encodings.join(" or "))]
    Decode {
        file: PathBuf,
        encodings: Vec<&'static str>,
    },

    #[error(
        "NEO4J_URI must start with a valid scheme (neo4j+s://, bolt+s://, etc.), got: {uri}"
    )]
    InvalidUri { uri: String },

    #[error("Missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual} (model: {model})")]
    EmbeddingDimension {
        expected: usize,
        actual: usize,
        model: String,
    },
}

/// Check that `uri` starts with one of [`VALID_URI_SCHEMES`].
pub fn validate_uri(uri: &str) -> Result<(), PipelineError> {
    if VALID_URI_SCHEMES.iter().any(|scheme| uri.starts_with(scheme)) {
        Ok(())
    } else {
        Err(PipelineError::InvalidUri {
            uri: uri.to_string(),
        })
    }
}
