//! HTTP embedding provider implementation
//!
//! Two wire formats are supported:
//! - **Bedrock Titan** (default): `POST /model/{model}/invoke` with one
//!   `inputText` per request, authenticated with a Bedrock API key
//!   (`AWS_BEARER_TOKEN_BEDROCK`)
//! - **OpenAI-compatible**: `POST /v1/embeddings` with a list `input`
//!   (OpenAI, Ollama, LiteLLM, vLLM...)

use super::traits::EmbeddingProvider;
use crate::error::PipelineError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which request/response format the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingApi {
    #[default]
    Titan,
    OpenAi,
}

impl EmbeddingApi {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Titan => "amazon.titan-embed-text-v2:0",
            Self::OpenAi => "text-embedding-3-small",
        }
    }

    pub fn default_dimensions(self) -> usize {
        match self {
            Self::Titan => 1024,
            Self::OpenAi => 1536,
        }
    }

    /// Titan takes one text per call, so batches stay small to respect
    /// Bedrock rate limits.
    pub fn batch_size(self) -> usize {
        match self {
            Self::Titan => 25,
            Self::OpenAi => 50,
        }
    }

    pub fn default_url(self, region: &str, model: &str) -> String {
        match self {
            Self::Titan => format!(
                "https://bedrock-runtime.{}.amazonaws.com/model/{}/invoke",
                region, model
            ),
            Self::OpenAi => "https://api.openai.com/v1/embeddings".to_string(),
        }
    }
}

impl FromStr for EmbeddingApi {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bedrock" | "titan" => Ok(Self::Titan),
            "openai" => Ok(Self::OpenAi),
            other => anyhow::bail!(
                "Unknown EMBEDDING_PROVIDER '{}' (expected bedrock or openai)",
                other
            ),
        }
    }
}

/// HTTP-based embedding provider.
///
/// Thread-safe and cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    api: EmbeddingApi,
    url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

/// OpenAI-compatible embedding request
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    input: &'a [String],
    /// Requested output length (text-embedding-3 models can shorten vectors)
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    dimensions: usize,
    normalize: bool,
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    embedding: Vec<f32>,
}

/// Error body shapes: OpenAI nests under `error`, Bedrock uses a top-level `message`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl HttpEmbeddingProvider {
    /// Create a provider with explicit configuration.
    ///
    /// * `url` - full endpoint, e.g. `https://api.openai.com/v1/embeddings`
    /// * `dimensions` - expected vector length; any other length is an error
    pub fn new(
        api: EmbeddingApi,
        url: String,
        model: String,
        api_key: Option<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api,
            url,
            model,
            api_key,
            dimensions,
        })
    }

    pub fn from_config(config: &crate::EmbeddingConfig) -> Result<Self> {
        Self::new(
            config.api,
            config.url.clone(),
            config.model.clone(),
            config.api_key.clone(),
            config.dimensions,
        )
    }

    async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<reqwest::Response> {
        let mut req = self.client.post(&self.url).json(body);

        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Failed to connect to embedding API at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(message) = err.error.map(|d| d.message).or(err.message) {
                    anyhow::bail!("Embedding API error ({}): {}", status.as_u16(), message);
                }
            }
            anyhow::bail!("Embedding API returned {}: {}", status.as_u16(), body);
        }

        Ok(response)
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(PipelineError::EmbeddingDimension {
                expected: self.dimensions,
                actual: embedding.len(),
                model: self.model.clone(),
            }
            .into());
        }
        Ok(())
    }

    async fn titan_embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = TitanRequest {
            input_text: text,
            dimensions: self.dimensions,
            normalize: true,
        };
        let resp: TitanResponse = self
            .post(&body)
            .await?
            .json()
            .await
            .context("Failed to parse Titan embedding response")?;
        self.check_dimensions(&resp.embedding)?;
        Ok(resp.embedding)
    }

    async fn openai_embed(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = OpenAiRequest {
            model: &self.model,
            input,
            dimensions: self.dimensions,
        };
        let resp: OpenAiResponse = self
            .post(&body)
            .await?
            .json()
            .await
            .context("Failed to parse embedding API response")?;

        // Sort by index to ensure correct ordering
        let mut data = resp.data;
        data.sort_by_key(|d| d.index);

        if data.len() != input.len() {
            anyhow::bail!(
                "Embedding API returned {} vectors for {} inputs",
                data.len(),
                input.len()
            );
        }

        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();
        for emb in &embeddings {
            self.check_dimensions(emb)?;
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        match self.api {
            EmbeddingApi::Titan => self.titan_embed(text).await,
            EmbeddingApi::OpenAi => self
                .openai_embed(&[text.to_string()])
                .await?
                .into_iter()
                .next()
                .context("Embedding API returned empty response"),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        match self.api {
            EmbeddingApi::Titan => {
                for text in texts {
                    all_embeddings.push(self.titan_embed(text).await?);
                }
            }
            EmbeddingApi::OpenAi => {
                for chunk in texts.chunks(self.api.batch_size()) {
                    let mut embeddings = self.openai_embed(chunk).await?;
                    all_embeddings.append(&mut embeddings);
                }
            }
        }
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn batch_size(&self) -> usize {
        self.api.batch_size()
    }
}
