//! Entity-analysis provider contract and the TextRazor-backed implementation.
//!
//! The client is constructed once per run from an access key and threaded as
//! a parameter into the aggregator — no ambient global credential state.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use contentforge_shared::{ContentForgeError, EntityMention, Result};

/// Default TextRazor endpoint.
const DEFAULT_BASE_URL: &str = "https://api.textrazor.com";

/// User-Agent string for entity-analysis requests.
const USER_AGENT: &str = concat!("ContentForge/", env!("CARGO_PKG_VERSION"));

/// Analyzes a page URL and reports the entities mentioned on it.
pub trait EntityClient {
    /// Request entity analysis for one page.
    fn analyze(&self, url: &str) -> impl Future<Output = Result<Vec<EntityMention>>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    response: AnalyzeBody,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    entities: Vec<WireEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntity {
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    relevance_score: f32,
}

// ---------------------------------------------------------------------------
// TextRazor client
// ---------------------------------------------------------------------------

/// Entity-analysis client backed by the TextRazor API.
pub struct TextRazorClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TextRazorClient {
    /// Create a new client with the given access key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ContentForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the provider endpoint (for tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl EntityClient for TextRazorClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn analyze(&self, url: &str) -> Result<Vec<EntityMention>> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-textrazor-key", &self.api_key)
            .form(&[("url", url), ("extractors", "entities")])
            .send()
            .await
            .map_err(|e| ContentForgeError::Network(format!("entity analysis failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Network(format!(
                "entity provider returned HTTP {status} for {url}"
            )));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ContentForgeError::parse(format!("invalid entity response: {e}")))?;

        let mentions: Vec<EntityMention> = parsed
            .response
            .entities
            .into_iter()
            .filter(|e| !e.entity_id.is_empty())
            .map(|e| EntityMention {
                id: e.entity_id,
                relevance: e.relevance_score,
            })
            .collect();

        debug!(url, mentions = mentions.len(), "entity analysis complete");
        Ok(mentions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn analyze_parses_entities() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-textrazor-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "entities": [
                        {"entityId": "Apache Kafka", "relevanceScore": 0.85},
                        {"entityId": "Apache Flink", "relevanceScore": 0.4},
                        {"entityId": "", "relevanceScore": 0.9},
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = TextRazorClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());

        let mentions = client.analyze("https://a.example.com/").await.unwrap();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].id, "Apache Kafka");
        assert!((mentions[0].relevance - 0.85).abs() < 1e-6);
    }

    #[tokio::test]
    async fn analyze_tolerates_missing_entities() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {}
            })))
            .mount(&server)
            .await;

        let client = TextRazorClient::new("test-key")
            .unwrap()
            .with_base_url(server.uri());

        let mentions = client.analyze("https://a.example.com/").await.unwrap();
        assert!(mentions.is_empty());
    }

    #[tokio::test]
    async fn analyze_http_error_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = TextRazorClient::new("bad-key")
            .unwrap()
            .with_base_url(server.uri());

        let err = client.analyze("https://a.example.com/").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
