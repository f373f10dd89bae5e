//! Search stage: SERP fetching and embedding-based competitor selection.
//!
//! The [`SerpClient`] fetches raw ranked results from the search provider;
//! [`select_similar`] filters out documentation subdomains and ranks the
//! remainder by cosine similarity between topic and title+snippet embeddings.

mod embedding;
mod selector;
mod serp;

pub use embedding::{Embedder, OpenAiEmbedder};
pub use selector::{cosine_similarity, is_docs_host, select_similar};
pub use serp::SerpClient;
