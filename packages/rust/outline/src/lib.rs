//! Competitor outline extraction.
//!
//! Fetches a competitor page and extracts its H1/H2/H3 heading structure in
//! document order. Extraction is best-effort by design: any failure (invalid
//! URL, timeout, non-2xx status, unparseable markup) yields an outline with
//! empty headings so one bad competitor page never aborts the run.

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use contentforge_shared::{CompetitorOutline, ContentForgeError, Heading, HeadingLevel, Result};

/// User-Agent string for page fetches.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default maximum number of headings kept per page.
pub const DEFAULT_MAX_HEADINGS: usize = 150;

/// Default page fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Options for outline extraction.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Cap on the number of headings returned per page.
    pub max_headings: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_headings: DEFAULT_MAX_HEADINGS,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Build the HTTP client used for competitor page fetches.
pub fn build_client(opts: &OutlineOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| ContentForgeError::Network(format!("failed to build HTTP client: {e}")))
}

/// Extract the heading outline of a competitor page. Never errors.
///
/// On any fetch or parse failure the returned outline has empty `headings`;
/// the failure is logged at `warn` for visibility.
#[instrument(skip(client, opts), fields(url = %url))]
pub async fn extract_outline(client: &Client, url: &str, opts: &OutlineOptions) -> CompetitorOutline {
    let headings = match fetch_page(client, url).await {
        Ok(html) => parse_headings(&html, opts.max_headings),
        Err(e) => {
            warn!(url, error = %e, "outline extraction failed, using empty outline");
            Vec::new()
        }
    };

    debug!(url, headings = headings.len(), "outline extracted");

    CompetitorOutline {
        url: url.to_string(),
        headings,
    }
}

/// Fetch a page body, validating the URL and response status.
async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| ContentForgeError::Network(format!("invalid URL '{url}': {e}")))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| ContentForgeError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ContentForgeError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| ContentForgeError::Network(format!("{url}: body read failed: {e}")))
}

/// Parse H1/H2/H3 headings from markup, in document order, capped at `max`.
///
/// Heading text is trimmed; headings with empty trimmed text are dropped.
/// No nesting validation is performed — a page may present H3 before any H2.
pub fn parse_headings(html: &str, max: usize) -> Vec<Heading> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("h1, h2, h3").expect("static selector");

    let mut headings = Vec::new();
    for element in doc.select(&selector) {
        let level = match element.value().name() {
            "h1" => HeadingLevel::H1,
            "h2" => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        };

        let text = element.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }

        headings.push(Heading { level, text });
        if headings.len() >= max {
            break;
        }
    }

    headings
}
