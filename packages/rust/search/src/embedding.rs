//! Embedding provider contract and the OpenAI-backed implementation.
//!
//! The selector only needs one vector per input string, order-preserving.
//! Vectors are L2-normalized after decode so cosine similarity reduces to
//! a dot product regardless of provider guarantees.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use contentforge_shared::{ContentForgeError, Result};

/// Default OpenAI API origin.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// User-Agent string for embedding requests.
const USER_AGENT: &str = concat!("ContentForge/", env!("CARGO_PKG_VERSION"));

/// Produces one fixed-dimension vector per input string, order-preserving.
pub trait Embedder {
    /// Embed each text. The output length and order match the input.
    fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>> + Send;
}

// ---------------------------------------------------------------------------
// OpenAI implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding client backed by the OpenAI `/v1/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    /// Create a new embedder with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ContentForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API origin (for tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Embedder for OpenAiEmbedder {
    #[instrument(skip_all, fields(count = texts.len()))]
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .map_err(|e| ContentForgeError::Network(format!("embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Network(format!(
                "embedding provider returned HTTP {status}"
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| ContentForgeError::parse(format!("invalid embeddings response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(ContentForgeError::parse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The provider tags rows with their input index; restore input order.
        let mut rows = parsed.data;
        rows.sort_by_key(|r| r.index);

        let vectors: Vec<Vec<f32>> = rows
            .into_iter()
            .map(|r| normalize(r.embedding))
            .collect();

        debug!(count = vectors.len(), "embeddings fetched");
        Ok(vectors)
    }
}

/// L2-normalize a vector in place. A zero vector is returned unchanged.
pub(crate) fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
