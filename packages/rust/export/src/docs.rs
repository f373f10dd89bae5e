//! Google Docs export: create a document and insert the article text.
//!
//! Two sequential calls against the Docs REST API: `documents.create` with
//! the title, then `documents.batchUpdate` inserting the full Markdown text
//! at index 1. The text is inserted verbatim; no Markdown-to-Docs styling.

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use contentforge_shared::{ContentForgeError, Result};

use crate::auth::StoredToken;

/// Default Google Docs API origin.
const DEFAULT_BASE_URL: &str = "https://docs.googleapis.com";

/// A document created in Google Docs.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// Google Docs document identifier.
    pub document_id: String,
    /// Shareable edit URL.
    pub document_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    document_id: String,
}

/// Client for the Google Docs REST API.
pub struct GoogleDocsClient {
    client: Client,
    base_url: String,
}

impl GoogleDocsClient {
    /// Create a new Docs client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ContentForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API origin (for tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a titled document and insert `text` as its body.
    #[instrument(skip(self, credentials, text), fields(title = %title, text_len = text.len()))]
    pub async fn create_document(
        &self,
        credentials: &StoredToken,
        title: &str,
        text: &str,
    ) -> Result<ExportedDocument> {
        let create_url = format!("{}/v1/documents", self.base_url);
        let response = self
            .client
            .post(&create_url)
            .bearer_auth(&credentials.access_token)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .map_err(|e| ContentForgeError::Export(format!("document create failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Export(format!(
                "document create returned HTTP {status}"
            )));
        }

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| ContentForgeError::Export(format!("invalid create response: {e}")))?;

        let update_url = format!(
            "{}/v1/documents/{}:batchUpdate",
            self.base_url, created.document_id
        );
        let response = self
            .client
            .post(&update_url)
            .bearer_auth(&credentials.access_token)
            .json(&serde_json::json!({
                "requests": [{
                    "insertText": {
                        "location": { "index": 1 },
                        "text": text,
                    }
                }]
            }))
            .send()
            .await
            .map_err(|e| ContentForgeError::Export(format!("document update failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Export(format!(
                "document update returned HTTP {status}"
            )));
        }

        let document_url = format!(
            "https://docs.google.com/document/d/{}/edit",
            created.document_id
        );
        info!(document_id = %created.document_id, "document exported");

        Ok(ExportedDocument {
            document_id: created.document_id,
            document_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> StoredToken {
        StoredToken {
            access_token: "bearer-token".into(),
            refresh_token: None,
            client_id: None,
            client_secret: None,
            expiry: None,
        }
    }

    #[tokio::test]
    async fn create_document_creates_then_inserts_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/documents"))
            .and(header("authorization", "Bearer bearer-token"))
            .and(body_partial_json(serde_json::json!({"title": "My Article"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documentId": "doc-123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/documents/doc-123:batchUpdate"))
            .and(body_partial_json(serde_json::json!({
                "requests": [{
                    "insertText": {
                        "location": {"index": 1},
                        "text": "# My Article\n\nBody text."
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GoogleDocsClient::new().unwrap().with_base_url(server.uri());
        let exported = client
            .create_document(&credentials(), "My Article", "# My Article\n\nBody text.")
            .await
            .unwrap();

        assert_eq!(exported.document_id, "doc-123");
        assert_eq!(
            exported.document_url,
            "https://docs.google.com/document/d/doc-123/edit"
        );
    }

    #[tokio::test]
    async fn create_failure_is_export_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/documents"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = GoogleDocsClient::new().unwrap().with_base_url(server.uri());
        let err = client
            .create_document(&credentials(), "My Article", "text")
            .await
            .unwrap_err();

        assert!(matches!(err, ContentForgeError::Export(_)));
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[tokio::test]
    async fn update_failure_is_export_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documentId": "doc-456"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/documents/doc-456:batchUpdate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GoogleDocsClient::new().unwrap().with_base_url(server.uri());
        let err = client
            .create_document(&credentials(), "My Article", "text")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("document update returned HTTP 500"));
    }
}
