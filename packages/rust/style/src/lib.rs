//! Style stage: deterministic rule compilation, prompt templating, and the
//! long-paragraph gate. Pure crate — no I/O, no external state.

mod gate;
mod prompts;
mod rules;

pub use gate::{DEFAULT_WORD_LIMIT, has_long_paragraph};
pub use prompts::{
    article_prompt, outline_prompt, polish_prompt, refactor_prompt, render_entities,
    render_outlines,
};
pub use rules::{StyleInputs, compile_style_rules};
