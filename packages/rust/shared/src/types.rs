//! Core domain types for the ContentForge pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// A single organic result returned by the search provider.
///
/// The link is kept as a raw string: provider data may be malformed, and the
/// relevance selector treats an unparseable link as a filtered-out result
/// rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    #[serde(default)]
    pub title: String,
    /// Result URL as returned by the provider.
    #[serde(default)]
    pub link: String,
    /// Result snippet (may be empty).
    #[serde(default)]
    pub snippet: String,
}

/// A search result paired with its embedding similarity to the topic.
///
/// Ephemeral: only used to sort and truncate inside the relevance selector.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub result: SearchResult,
    /// Cosine similarity to the topic, in [-1, 1].
    pub similarity: f32,
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

/// Heading level extracted from competitor markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Markdown prefix for rendering the heading into prompt text.
    pub fn markdown_prefix(&self) -> &'static str {
        match self {
            Self::H1 => "#",
            Self::H2 => "##",
            Self::H3 => "###",
        }
    }
}

/// A single heading with its level and trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
}

/// The heading structure of one selected competitor page.
///
/// `headings` is empty when the fetch or parse failed — a degraded but
/// valid result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorOutline {
    /// Page URL the headings were extracted from.
    pub url: String,
    /// Headings in document order, capped by the extractor.
    pub headings: Vec<Heading>,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// One entity mention reported by the entity-analysis provider for a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMention {
    /// Provider-normalized entity identifier.
    pub id: String,
    /// Topical relevance score in [0, 1].
    pub relevance: f32,
}

// ---------------------------------------------------------------------------
// GeneratedDocument
// ---------------------------------------------------------------------------

/// Which generation stage produced the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStage {
    Outline,
    Draft,
    Refactored,
    Polished,
}

/// Markdown produced by a generation stage.
///
/// The only entity whose lifecycle spans the whole run: created at the
/// outline stage and replaced by each subsequent stage. At most one live
/// article instance exists per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub stage: DraftStage,
    pub markdown: String,
}

impl GeneratedDocument {
    pub fn new(stage: DraftStage, markdown: impl Into<String>) -> Self {
        Self {
            stage,
            markdown: markdown.into(),
        }
    }

    /// Approximate word count of the markdown body.
    pub fn word_count(&self) -> usize {
        self.markdown.split_whitespace().count()
    }
}
