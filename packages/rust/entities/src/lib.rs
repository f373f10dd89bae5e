//! Entity aggregation stage: per-page entity analysis and cross-page
//! frequency ranking into the "must include" set.

mod aggregate;
mod client;

pub use aggregate::{
    DEFAULT_ENTITY_COUNT, DEFAULT_RELEVANCE_THRESHOLD, EntityAggregate, aggregate_entities,
    rank_by_frequency,
};
pub use client::{EntityClient, TextRazorClient};
