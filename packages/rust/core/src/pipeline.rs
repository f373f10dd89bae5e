//! End-to-end generation pipeline:
//! search → select → outline extraction → entity aggregation → four chained
//! generation stages with the long-paragraph gate in between.
//!
//! Single sequential flow: no stage starts before its predecessor completes,
//! and per-page operations run one URL at a time in input order. Per-item
//! failures degrade (empty outline, skipped page); stage-level emptiness is
//! carried forward; only generation-service failure aborts the run.

use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use contentforge_entities::{EntityClient, aggregate_entities};
use contentforge_outline::{OutlineOptions, extract_outline};
use contentforge_search::{Embedder, SerpClient, select_similar};
use contentforge_shared::{
    AppConfig, CompetitorOutline, ContentForgeError, DraftStage, GeneratedDocument, Result, RunId,
    SearchResult,
};
use contentforge_style::{
    StyleInputs, article_prompt, compile_style_rules, has_long_paragraph, outline_prompt,
    polish_prompt, refactor_prompt,
};

use crate::generation::GenerationService;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Article topic (search query and prompt subject).
    pub topic: String,
    /// Style rule inputs threaded into every prompt.
    pub style: StyleInputs,
    /// Search country code (`gl`).
    pub country_code: String,
    /// Search language code (`hl`).
    pub language_code: String,
    /// Organic results to fetch.
    pub search_results: usize,
    /// Competitor pages to select (K).
    pub competitor_count: usize,
    /// Heading cap per competitor page.
    pub max_headings: usize,
    /// Competitor page fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Entity relevance threshold (τ).
    pub entity_relevance_threshold: f32,
    /// Top entities kept (N).
    pub entity_count: usize,
    /// Long-paragraph gate ceiling.
    pub paragraph_word_limit: usize,
    /// Generation model identifier.
    pub model: String,
}

impl GenerateConfig {
    /// Build a run config from the app config, topic, and style inputs.
    pub fn from_app_config(config: &AppConfig, topic: impl Into<String>, style: StyleInputs) -> Self {
        Self {
            topic: topic.into(),
            style,
            country_code: config.defaults.country_code.clone(),
            language_code: config.defaults.language_code.clone(),
            search_results: config.defaults.search_results,
            competitor_count: config.defaults.competitor_count,
            max_headings: config.defaults.max_headings,
            fetch_timeout_secs: config.defaults.fetch_timeout_secs,
            entity_relevance_threshold: config.defaults.entity_relevance_threshold,
            entity_count: config.defaults.entity_count,
            paragraph_word_limit: config.defaults.paragraph_word_limit,
            model: config.openai.default_model.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a completed pipeline run.
///
/// Both the outline and the final article are addressable; each stage's
/// output is immutable once returned.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Run identifier.
    pub run_id: RunId,
    /// The topic the run was generated for.
    pub topic: String,
    /// The outline-stage document.
    pub outline: GeneratedDocument,
    /// The final article (polished stage).
    pub article: GeneratedDocument,
    /// Competitor pages selected by the relevance selector.
    pub selected: Vec<SearchResult>,
    /// Extracted competitor outlines (input order, possibly empty headings).
    pub competitor_outlines: Vec<CompetitorOutline>,
    /// Must-include entity identifiers, descending frequency.
    pub entities: Vec<String>,
    /// Pages whose entity analysis failed (skipped, not fatal).
    pub entity_pages_failed: usize,
    /// Whether the long-paragraph refactor pass ran.
    pub refactored: bool,
    /// Total elapsed time.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a competitor page is fetched for outline extraction.
    fn page_fetched(&self, url: &str, current: usize, total: usize);
    /// Called when a generation stage completes, with its markdown.
    ///
    /// Prior-stage outputs stay addressable through this callback even if a
    /// later stage fails.
    fn stage_complete(&self, stage: DraftStage, markdown: &str);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &GenerateOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn stage_complete(&self, _stage: DraftStage, _markdown: &str) {}
    fn done(&self, _outcome: &GenerateOutcome) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full generation pipeline.
///
/// 1. Fetch top organic search results
/// 2. Select the K most relevant competitors by embedding similarity
/// 3. Extract each competitor's heading outline (best-effort)
/// 4. Aggregate must-include entities across competitor pages
/// 5. Outline stage → draft stage → conditional refactor → polish stage
#[instrument(skip_all, fields(topic = %config.topic, model = %config.model))]
pub async fn generate_article<E, C, G>(
    config: &GenerateConfig,
    serp: &SerpClient,
    embedder: &E,
    entity_client: &C,
    generation: &G,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome>
where
    E: Embedder,
    C: EntityClient,
    G: GenerationService,
{
    let start = Instant::now();
    let run_id = RunId::new();

    if config.topic.trim().is_empty() {
        return Err(ContentForgeError::validation("topic must not be empty"));
    }

    info!(%run_id, "starting generation pipeline");

    // --- Phase 1: Search ---
    progress.phase("Searching top organic results");
    let results = serp
        .top_organic(
            &config.topic,
            &config.country_code,
            &config.language_code,
            config.search_results,
        )
        .await?;

    if results.is_empty() {
        return Err(ContentForgeError::validation(
            "no search results found for topic",
        ));
    }
    info!(results = results.len(), "search complete");

    // --- Phase 2: Relevance selection ---
    progress.phase("Selecting most relevant competitors");
    let selected = select_similar(&config.topic, &results, embedder, config.competitor_count).await?;

    if selected.is_empty() {
        // Zero competitors is a degraded but valid state; continue.
        warn!("no suitable competitor pages, proceeding without competitor data");
    } else {
        info!(selected = selected.len(), "competitors selected");
    }

    // --- Phase 3: Outline extraction ---
    progress.phase("Extracting competitor outlines");
    let outline_opts = OutlineOptions {
        max_headings: config.max_headings,
        timeout_secs: config.fetch_timeout_secs,
    };
    let page_client = contentforge_outline::build_client(&outline_opts)?;

    let mut competitor_outlines: Vec<CompetitorOutline> = Vec::new();
    let total = selected.len();
    for (i, result) in selected.iter().enumerate() {
        progress.page_fetched(&result.link, i + 1, total);
        competitor_outlines.push(extract_outline(&page_client, &result.link, &outline_opts).await);
    }

    // --- Phase 4: Entity aggregation ---
    progress.phase("Analyzing key entities");
    let urls: Vec<String> = selected.iter().map(|r| r.link.clone()).collect();
    let aggregate = aggregate_entities(
        entity_client,
        &urls,
        config.entity_relevance_threshold,
        config.entity_count,
    )
    .await?;

    if aggregate.entities.is_empty() {
        info!("no entities extracted, proceeding without entity requirements");
    } else {
        info!(
            entities = aggregate.entities.len(),
            pages_failed = aggregate.pages_failed,
            "entities aggregated"
        );
    }

    // --- Phase 5: Outline generation ---
    progress.phase("Generating content outline");
    let style_rules = compile_style_rules(&config.style);

    let prompt = outline_prompt(
        &config.topic,
        &config.style.tonality,
        &config.style.context,
        &config.style.theme,
        &style_rules,
        &competitor_outlines,
        &aggregate.entities,
    );
    let outline_text = generation.generate(&prompt, &config.model).await?;
    let outline = GeneratedDocument::new(DraftStage::Outline, outline_text);
    progress.stage_complete(DraftStage::Outline, &outline.markdown);

    // --- Phase 6: Article generation ---
    progress.phase("Writing full article");
    let prompt = article_prompt(
        &config.topic,
        &config.style.audience_persona,
        &style_rules,
        &aggregate.entities,
        &outline.markdown,
    );
    let mut article = GeneratedDocument::new(
        DraftStage::Draft,
        generation.generate(&prompt, &config.model).await?,
    );
    progress.stage_complete(DraftStage::Draft, &article.markdown);

    // --- Phase 7: Conditional refactor (one-shot) ---
    // The refactor output is deliberately not re-checked: one remediation
    // pass, never more.
    let mut refactored = false;
    if has_long_paragraph(&article.markdown, config.paragraph_word_limit) {
        progress.phase("Refactoring long paragraphs");
        let prompt = refactor_prompt(&article.markdown);
        article = GeneratedDocument::new(
            DraftStage::Refactored,
            generation.generate(&prompt, &config.model).await?,
        );
        progress.stage_complete(DraftStage::Refactored, &article.markdown);
        refactored = true;
    }

    // --- Phase 8: Final polish ---
    progress.phase("Polishing content");
    let prompt = polish_prompt(&article.markdown);
    let article = GeneratedDocument::new(
        DraftStage::Polished,
        generation.generate(&prompt, &config.model).await?,
    );
    progress.stage_complete(DraftStage::Polished, &article.markdown);

    let outcome = GenerateOutcome {
        run_id,
        topic: config.topic.clone(),
        outline,
        article,
        selected,
        competitor_outlines,
        entities: aggregate.entities,
        entity_pages_failed: aggregate.pages_failed,
        refactored,
        elapsed: start.elapsed(),
    };

    progress.done(&outcome);

    info!(
        run_id = %outcome.run_id,
        selected = outcome.selected.len(),
        entities = outcome.entities.len(),
        refactored = outcome.refactored,
        elapsed_ms = outcome.elapsed.as_millis(),
        "generation pipeline complete"
    );

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
