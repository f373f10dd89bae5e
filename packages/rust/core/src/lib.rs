//! Pipeline orchestration: wires search, selection, outline extraction,
//! entity aggregation, and the chained generation stages into one
//! sequential run.

mod generation;
mod pipeline;

pub use generation::{GenerationService, OpenAiGeneration};
pub use pipeline::{
    GenerateConfig, GenerateOutcome, ProgressReporter, SilentProgress, generate_article,
};
