//! Search provider client (SerpAPI-compatible).
//!
//! Fetches the top organic results for a topic. The response is truncated to
//! the requested count; an empty result list is a valid outcome the caller
//! decides how to handle.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use contentforge_shared::{ContentForgeError, Result, SearchResult};

/// Default SerpAPI endpoint.
const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("ContentForge/", env!("CARGO_PKG_VERSION"));

/// Wire shape of the provider response. Only the organic results matter.
#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SearchResult>,
}

/// Client for the external search provider.
pub struct SerpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpClient {
    /// Create a new client with the given API key.
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

    /// Fetch the top organic results for `query`.
    ///
    /// `country` and `language` map to the provider's `gl`/`hl` parameters.
    /// The returned list is truncated to `num` entries.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn top_organic(
        &self,
        query: &str,
        country: &str,
        language: &str,
        num: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", &self.api_key),
                ("gl", country),
                ("hl", language),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ContentForgeError::Network(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Network(format!(
                "search provider returned HTTP {status}"
            )));
        }

        let parsed: SerpResponse = response
            .json()
            .await
            .map_err(|e| ContentForgeError::parse(format!("invalid search response: {e}")))?;

        let mut results = parsed.organic_results;
        results.truncate(num);

        debug!(count = results.len(), "organic results fetched");
        Ok(results)
    }
}
