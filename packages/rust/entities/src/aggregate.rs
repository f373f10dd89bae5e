//! Cross-page entity frequency aggregation.
//!
//! Builds the "must include" entity set threaded into every downstream
//! prompt: per-page mentions above the relevance threshold are lowercased,
//! pooled into one multiset, counted, and ranked by descending frequency
//! with first-seen tie-breaks.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use contentforge_shared::Result;

use crate::client::EntityClient;

/// Default minimum relevance score for an entity to be counted.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.2;

/// Default number of top entities returned.
pub const DEFAULT_ENTITY_COUNT: usize = 15;

/// Aggregated entity result with a side channel for observability.
#[derive(Debug, Clone, Default)]
pub struct EntityAggregate {
    /// Top entity identifiers, descending frequency. May be empty.
    pub entities: Vec<String>,
    /// Number of pages whose analysis failed and contributed nothing.
    pub pages_failed: usize,
}

/// Aggregate the top-N most frequent entities across the given pages.
///
/// Per-URL failures are swallowed at the item level: a failed page simply
/// contributes zero entities and increments `pages_failed`. An empty result
/// is a valid, non-error state ("no required entities").
#[instrument(skip(client, urls), fields(pages = urls.len(), threshold, top_n))]
pub async fn aggregate_entities<C: EntityClient>(
    client: &C,
    urls: &[String],
    threshold: f32,
    top_n: usize,
) -> Result<EntityAggregate> {
    // Explicit fold: accumulate kept mentions, drop failures.
    let mut multiset: Vec<String> = Vec::new();
    let mut pages_failed = 0usize;

    for url in urls {
        match client.analyze(url).await {
            Ok(mentions) => {
                multiset.extend(
                    mentions
                        .into_iter()
                        .filter(|m| m.relevance >= threshold)
                        .map(|m| m.id.to_lowercase()),
                );
            }
            Err(e) => {
                warn!(url = %url, error = %e, "entity analysis failed for page, skipping");
                pages_failed += 1;
            }
        }
    }

    let entities = rank_by_frequency(&multiset, top_n);

    debug!(
        kept = multiset.len(),
        distinct = entities.len(),
        pages_failed,
        "entity aggregation complete"
    );

    Ok(EntityAggregate {
        entities,
        pages_failed,
    })
}

/// Rank identifiers by raw occurrence count in the multiset, descending,
/// tie-broken by first-seen order. Truncated to `top_n`.
pub fn rank_by_frequency(multiset: &[String], top_n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for id in multiset {
        let entry = counts.entry(id.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(id.as_str());
        }
        *entry += 1;
    }

    // first_seen is already in tie-break order; a stable sort by count
    // preserves it among equals.
    let mut ranked = first_seen;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.truncate(top_n);

    ranked.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentforge_shared::{ContentForgeError, EntityMention};
    use std::collections::HashMap as Map;

    /// Entity client serving canned per-URL responses.
    struct FakeEntityClient {
        pages: Map<String, Vec<EntityMention>>,
        failing: Vec<String>,
    }

    impl FakeEntityClient {
        fn new() -> Self {
            Self {
                pages: Map::new(),
                failing: Vec::new(),
            }
        }

        fn with_page(mut self, url: &str, mentions: Vec<(&str, f32)>) -> Self {
            self.pages.insert(
                url.to_string(),
                mentions
                    .into_iter()
                    .map(|(id, relevance)| EntityMention {
                        id: id.to_string(),
                        relevance,
                    })
                    .collect(),
            );
            self
        }

        fn with_failure(mut self, url: &str) -> Self {
            self.failing.push(url.to_string());
            self
        }
    }

    impl EntityClient for FakeEntityClient {
        async fn analyze(&self, url: &str) -> contentforge_shared::Result<Vec<EntityMention>> {
            if self.failing.iter().any(|u| u == url) {
                return Err(ContentForgeError::Network(format!("{url}: unreachable")));
            }
            Ok(self.pages.get(url).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn case_insensitive_cross_page_frequency() {
        // Two pages: ["kafka","Kafka","flink"] and ["kafka"], all above
        // threshold → kafka=3, flink=1 → top-1 is ["kafka"].
        let client = FakeEntityClient::new()
            .with_page(
                "https://a.example.com/",
                vec![("kafka", 0.9), ("Kafka", 0.8), ("flink", 0.5)],
            )
            .with_page("https://b.example.com/", vec![("kafka", 0.7)]);

        let urls = vec![
            "https://a.example.com/".to_string(),
            "https://b.example.com/".to_string(),
        ];

        let agg = aggregate_entities(&client, &urls, 0.2, 1).await.unwrap();
        assert_eq!(agg.entities, vec!["kafka".to_string()]);
        assert_eq!(agg.pages_failed, 0);

        let agg = aggregate_entities(&client, &urls, 0.2, 15).await.unwrap();
        assert_eq!(agg.entities, vec!["kafka".to_string(), "flink".to_string()]);
    }

    #[tokio::test]
    async fn threshold_filters_low_relevance() {
        let client = FakeEntityClient::new().with_page(
            "https://a.example.com/",
            vec![("kafka", 0.9), ("noise", 0.1), ("borderline", 0.2)],
        );

        let urls = vec!["https://a.example.com/".to_string()];
        let agg = aggregate_entities(&client, &urls, 0.2, 15).await.unwrap();

        // relevance >= threshold keeps the borderline entity.
        assert_eq!(
            agg.entities,
            vec!["kafka".to_string(), "borderline".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_page_contributes_nothing() {
        let client = FakeEntityClient::new()
            .with_page("https://a.example.com/", vec![("kafka", 0.9)])
            .with_failure("https://down.example.com/");

        let urls = vec![
            "https://a.example.com/".to_string(),
            "https://down.example.com/".to_string(),
        ];

        let agg = aggregate_entities(&client, &urls, 0.2, 15).await.unwrap();
        assert_eq!(agg.entities, vec!["kafka".to_string()]);
        assert_eq!(agg.pages_failed, 1);
    }

    #[tokio::test]
    async fn all_filtered_is_valid_empty_state() {
        let client =
            FakeEntityClient::new().with_page("https://a.example.com/", vec![("noise", 0.05)]);

        let urls = vec!["https://a.example.com/".to_string()];
        let agg = aggregate_entities(&client, &urls, 0.2, 15).await.unwrap();
        assert!(agg.entities.is_empty());
    }

    #[test]
    fn rank_ties_broken_by_first_seen() {
        let multiset: Vec<String> = ["beta", "alpha", "beta", "alpha", "gamma"]
            .into_iter()
            .map(String::from)
            .collect();

        let ranked = rank_by_frequency(&multiset, 15);
        // beta and alpha both count 2; beta was seen first.
        assert_eq!(ranked, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn rank_output_bounded_by_top_n() {
        let multiset: Vec<String> = (0..20).map(|i| format!("entity-{i}")).collect();
        let ranked = rank_by_frequency(&multiset, 5);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn rank_counts_are_non_increasing() {
        let multiset: Vec<String> = ["a", "b", "b", "c", "c", "c"]
            .into_iter()
            .map(String::from)
            .collect();
        let ranked = rank_by_frequency(&multiset, 15);
        assert_eq!(ranked, vec!["c", "b", "a"]);
    }
}
