//! Populate Graph
//!
//! Loads the manufacturing product development dataset into Neo4j:
//! - Declarative CSV load tables for nodes and relationships
//! - Graph-side derivation of maturity levels, resources and the milestone chain
//! - Incremental description embeddings with vector indexes
//! - Read-only sample and semantic test query catalog

pub mod catalog;
pub mod embeddings;
pub mod error;
pub mod ingest;
pub mod neo4j;
pub mod pipeline;
pub mod queries;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use embeddings::EmbeddingApi;
use error::PipelineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Load `.env` into the process environment, falling back to `CONFIG.txt`.
///
/// Variables already set in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(_) => {
            if dotenvy::from_filename("CONFIG.txt").is_ok() {
                tracing::debug!("Loaded environment from CONFIG.txt");
            }
        }
    }
}

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub embedding: EmbeddingYamlConfig,
    pub data: DataYamlConfig,
}

/// Neo4j configuration section. URI and password have no default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: Option<String>,
    pub user: String,
    pub password: Option<String>,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: None,
            user: "neo4j".into(),
            password: None,
        }
    }
}

/// Embedding configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EmbeddingYamlConfig {
    /// `bedrock` (default) or `openai`
    pub provider: Option<String>,
    pub model: Option<String>,
    pub region: Option<String>,
    pub url: Option<String>,
    pub dimensions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataYamlConfig {
    pub dir: String,
    pub sample_size: usize,
}

impl Default for DataYamlConfig {
    fn default() -> Self {
        Self {
            dir: "./TransformedData".into(),
            sample_size: 10,
        }
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api: EmbeddingApi,
    pub model: String,
    pub region: String,
    pub url: String,
    /// Bearer token: Bedrock API key or OpenAI key
    pub api_key: Option<String>,
    pub dimensions: usize,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub data_dir: PathBuf,
    /// Rows shown per sample query
    pub sample_size: usize,
    pub embedding: EmbeddingConfig,
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", name, raw, e)),
        None => Ok(None),
    }
}

impl EmbeddingConfig {
    /// Bedrock always needs a key. OpenAI needs one only at its public
    /// endpoint; a local OpenAI-compatible server may run without.
    pub fn validate(&self) -> Result<(), PipelineError> {
        match self.api {
            EmbeddingApi::Titan if self.api_key.is_none() => {
                Err(PipelineError::MissingSetting("AWS_BEARER_TOKEN_BEDROCK"))
            }
            EmbeddingApi::OpenAi
                if self.api_key.is_none()
                    && self.url == self.api.default_url(&self.region, &self.model) =>
            {
                Err(PipelineError::MissingSetting("OPENAI_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. The result is
    /// validated: URI and password must be present, the URI scheme known and
    /// the embedding provider credential available.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let neo4j_uri = env("NEO4J_URI")
            .or(yaml.neo4j.uri)
            .ok_or(PipelineError::MissingSetting("NEO4J_URI"))?;
        error::validate_uri(&neo4j_uri)?;
        let neo4j_password = env("NEO4J_PASSWORD")
            .or(yaml.neo4j.password)
            .ok_or(PipelineError::MissingSetting("NEO4J_PASSWORD"))?;
        let neo4j_user = env("NEO4J_USERNAME")
            .or_else(|| env("NEO4J_USER"))
            .unwrap_or(yaml.neo4j.user);

        let data_dir = PathBuf::from(env("DATA_DIR").unwrap_or(yaml.data.dir));
        let sample_size = env_parsed("SAMPLE_SIZE")?.unwrap_or(yaml.data.sample_size);

        let embedding = Self::embedding_config(yaml.embedding)?;
        embedding.validate()?;

        Ok(Self {
            neo4j_uri,
            neo4j_user,
            neo4j_password,
            data_dir,
            sample_size,
            embedding,
        })
    }

    fn embedding_config(yaml: EmbeddingYamlConfig) -> Result<EmbeddingConfig> {
        let api = match env("EMBEDDING_PROVIDER").or(yaml.provider) {
            Some(name) => name.parse()?,
            None => EmbeddingApi::default(),
        };
        let model = env("EMBEDDING_MODEL_ID")
            .or(yaml.model)
            .unwrap_or_else(|| api.default_model().to_string());
        let region = env("REGION")
            .or(yaml.region)
            .unwrap_or_else(|| "us-west-2".to_string());
        let url = env("EMBEDDING_URL")
            .or(yaml.url)
            .unwrap_or_else(|| api.default_url(&region, &model));
        let api_key = match api {
            EmbeddingApi::Titan => env("AWS_BEARER_TOKEN_BEDROCK"),
            EmbeddingApi::OpenAi => env("OPENAI_API_KEY"),
        };
        let dimensions = env_parsed("EMBEDDING_DIMENSIONS")?
            .or(yaml.dimensions)
            .unwrap_or_else(|| api.default_dimensions());

        Ok(EmbeddingConfig {
            api,
            model,
            region,
            url,
            api_key,
            dimensions,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
