//! Application configuration for ContentForge.
//!
//! User config lives at `~/.contentforge/contentforge.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file — only env var names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ContentForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "contentforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".contentforge";

// ---------------------------------------------------------------------------
// Config structs (matching contentforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pipeline tuning defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// OpenAI settings (generation + embeddings).
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Search provider settings.
    #[serde(default)]
    pub serp: SerpConfig,

    /// Entity-analysis provider settings.
    #[serde(default)]
    pub entities: EntitiesConfig,

    /// Style rule inputs.
    #[serde(default)]
    pub style: StyleConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Search country code (Google `gl` parameter).
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Search language code (Google `hl` parameter).
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Number of organic results to fetch from the search provider.
    #[serde(default = "default_search_results")]
    pub search_results: usize,

    /// Number of competitor pages to select by embedding similarity.
    #[serde(default = "default_competitor_count")]
    pub competitor_count: usize,

    /// Maximum headings extracted per competitor page.
    #[serde(default = "default_max_headings")]
    pub max_headings: usize,

    /// Page fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Minimum relevance score for an entity to be counted.
    #[serde(default = "default_entity_relevance_threshold")]
    pub entity_relevance_threshold: f32,

    /// Number of top entities threaded into prompts.
    #[serde(default = "default_entity_count")]
    pub entity_count: usize,

    /// Word-count ceiling for the long-paragraph gate.
    #[serde(default = "default_paragraph_word_limit")]
    pub paragraph_word_limit: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            language_code: default_language_code(),
            search_results: default_search_results(),
            competitor_count: default_competitor_count(),
            max_headings: default_max_headings(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            entity_relevance_threshold: default_entity_relevance_threshold(),
            entity_count: default_entity_count(),
            paragraph_word_limit: default_paragraph_word_limit(),
        }
    }
}

fn default_country_code() -> String {
    "us".into()
}
fn default_language_code() -> String {
    "en".into()
}
fn default_search_results() -> usize {
    10
}
fn default_competitor_count() -> usize {
    3
}
fn default_max_headings() -> usize {
    150
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_entity_relevance_threshold() -> f32 {
    0.2
}
fn default_entity_count() -> usize {
    15
}
fn default_paragraph_word_limit() -> usize {
    130
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    /// Default model for the four generation stages.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Model used for topic/candidate embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            default_model: default_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

/// `[serp]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpConfig {
    /// Name of the env var holding the SerpAPI key.
    #[serde(default = "default_serp_key_env")]
    pub api_key_env: String,
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_serp_key_env(),
        }
    }
}

fn default_serp_key_env() -> String {
    "SERPAPI_KEY".into()
}

/// `[entities]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitiesConfig {
    /// Name of the env var holding the TextRazor key.
    #[serde(default = "default_entities_key_env")]
    pub api_key_env: String,
}

impl Default for EntitiesConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_entities_key_env(),
        }
    }
}

fn default_entities_key_env() -> String {
    "TEXTRAZOR_KEY".into()
}

/// `[style]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Words the generation service must never use.
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
        }
    }
}

fn default_banned_words() -> Vec<String> {
    [
        "remarkable",
        "ground breaking",
        "excitingly",
        "revolutionize",
        "transformative",
        "unrivaled",
        "game-changer",
        "cutting-edge",
        "next-level",
        "unlock",
        "seamless",
        "synergy",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.contentforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ContentForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.contentforge/contentforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ContentForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ContentForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ContentForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ContentForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read an API key from the env var named in config. Errors if unset or empty.
pub fn read_api_key(var_name: &str, provider: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(ContentForgeError::config(format!(
            "{provider} API key not found. Set the {var_name} environment variable."
        ))),
    }
}
