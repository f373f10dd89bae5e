//! Shared types, error model, and configuration for ContentForge.
//!
//! This crate is the foundation depended on by all other ContentForge crates.
//! It provides:
//! - [`ContentForgeError`] — the unified error type
//! - Domain types ([`SearchResult`], [`CompetitorOutline`], [`GeneratedDocument`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EntitiesConfig, OpenAiConfig, SerpConfig, StyleConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, read_api_key,
};
pub use error::{ContentForgeError, Result};
pub use types::{
    CompetitorOutline, DraftStage, EntityMention, GeneratedDocument, Heading, HeadingLevel,
    RankedCandidate, RunId, SearchResult,
};
