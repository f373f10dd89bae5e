//! Generation service contract and the OpenAI-backed implementation.
//!
//! The language model is an opaque text-in/text-out collaborator: one prompt
//! in, one completion out, stateless across stages. A failed call gets
//! exactly one attempt — no retry, no backoff — and is fatal to the run.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use contentforge_shared::{ContentForgeError, Result};

/// Default OpenAI API origin.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Sampling temperature for all generation stages.
const TEMPERATURE: f32 = 0.7;

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("ContentForge/", env!("CARGO_PKG_VERSION"));

/// Opaque text-in/text-out generation collaborator.
pub trait GenerationService {
    /// Generate a completion for `prompt` with the given model.
    fn generate(&self, prompt: &str, model: &str) -> impl Future<Output = Result<String>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

// ---------------------------------------------------------------------------
// OpenAI implementation
// ---------------------------------------------------------------------------

/// Generation client backed by the OpenAI chat-completions endpoint.
pub struct OpenAiGeneration {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiGeneration {
    /// Create a new generation client with the given API key.
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

    /// Override the API origin (for tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl GenerationService for OpenAiGeneration {
    #[instrument(skip(self, prompt), fields(model = %model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": TEMPERATURE,
            }))
            .send()
            .await
            .map_err(|e| ContentForgeError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentForgeError::Generation(format!(
                "generation service returned HTTP {status}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ContentForgeError::Generation(format!("invalid response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ContentForgeError::Generation("response contained no choices".into()))?;

        debug!(output_len = text.len(), "generation complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_returns_first_choice_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "# Generated Outline"}}
                ]
            })))
            .mount(&server)
            .await;

        let service = OpenAiGeneration::new("test-key")
            .unwrap()
            .with_base_url(server.uri());

        let text = service.generate("write an outline", "gpt-4").await.unwrap();
        assert_eq!(text, "# Generated Outline");
    }

    #[tokio::test]
    async fn http_error_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let service = OpenAiGeneration::new("test-key")
            .unwrap()
            .with_base_url(server.uri());

        let err = service.generate("prompt", "gpt-4").await.unwrap_err();
        assert!(matches!(
            err,
            contentforge_shared::ContentForgeError::Generation(_)
        ));
    }

    #[tokio::test]
    async fn empty_choices_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let service = OpenAiGeneration::new("test-key")
            .unwrap()
            .with_base_url(server.uri());

        let err = service.generate("prompt", "gpt-4").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
