//! Relevance selector — picks the K competitor pages closest to the topic.
//!
//! Filtering precedes ranking: results with no link, an unparseable link, or
//! a documentation subdomain host are dropped before any embedding call.
//! Ranking is cosine similarity between the topic vector and each
//! candidate's title+snippet vector, stable-sorted descending.

use std::cmp::Ordering;

use tracing::{debug, instrument};
use url::Url;

use contentforge_shared::{RankedCandidate, Result, SearchResult};

use crate::embedding::Embedder;

/// Host prefix marking a reserved documentation subdomain.
const DOCS_HOST_PREFIX: &str = "docs.";

/// Select at most `k` results ordered by descending topic relevance.
///
/// An empty filtered set returns an empty Vec without touching the embedder:
/// zero competitors is a valid, non-error outcome downstream stages tolerate.
#[instrument(skip(results, embedder), fields(topic = %topic, candidates = results.len()))]
pub async fn select_similar<E: Embedder>(
    topic: &str,
    results: &[SearchResult],
    embedder: &E,
    k: usize,
) -> Result<Vec<SearchResult>> {
    let filtered: Vec<&SearchResult> = results
        .iter()
        .filter(|r| !r.link.is_empty() && !is_docs_host(&r.link))
        .collect();

    if filtered.is_empty() {
        debug!("no candidates survived filtering");
        return Ok(Vec::new());
    }

    let texts: Vec<String> = filtered
        .iter()
        .map(|r| format!("{} {}", r.title, r.snippet))
        .collect();

    let topic_text = [topic.to_string()];
    let topic_vec = embedder.embed(&topic_text).await?;
    let text_vecs = embedder.embed(&texts).await?;

    let mut ranked: Vec<RankedCandidate> = filtered
        .iter()
        .zip(text_vecs.iter())
        .map(|(r, v)| RankedCandidate {
            result: (*r).clone(),
            similarity: cosine_similarity(&topic_vec[0], v),
        })
        .collect();

    // Stable sort: ties keep original input order.
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });

    ranked.truncate(k);

    debug!(selected = ranked.len(), "competitors selected");
    Ok(ranked.into_iter().map(|c| c.result).collect())
}

/// Whether a link points at a reserved documentation subdomain.
///
/// Links that cannot be parsed or have no host (`mailto:`, `data:`) are
/// treated as filtered-out (fail open, not fatal): only links that name a
/// fetchable host are worth ranking.
pub fn is_docs_host(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => url
            .host_str()
            .map(|h| h.to_lowercase().starts_with(DOCS_HOST_PREFIX))
            .unwrap_or(true),
        Err(_) => true,
    }
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Inputs from [`crate::embedding`] are already unit-length, but the norms
/// are computed anyway so the function is correct for arbitrary vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
