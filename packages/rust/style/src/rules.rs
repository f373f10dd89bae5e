//! Style rule compiler.
//!
//! Renders the fixed global rule template plus the caller-supplied free-text
//! fields and banned words into the single constraint block consumed by
//! every prompt. Pure function: deterministic, no I/O, recomputed fresh per
//! run. Free text is rendered verbatim with no validation.

/// Caller-supplied style inputs.
#[derive(Debug, Clone, Default)]
pub struct StyleInputs {
    /// Desired tone of the article.
    pub tonality: String,
    /// Context about the target audience.
    pub context: String,
    /// Core themes to emphasize.
    pub theme: String,
    /// Description of the target reader.
    pub audience_persona: String,
    /// Words the generation service must never use, in caller order.
    pub banned_words: Vec<String>,
}

/// Render the complete style rule block.
///
/// Banned words appear verbatim, comma-space-joined, so the generation
/// service can honor the exclusion.
pub fn compile_style_rules(inputs: &StyleInputs) -> String {
    let banned_words = inputs.banned_words.join(", ");

    format!(
        "\
GLOBAL CONTENT RULES
- One H1 only
- Each H2 starts with exactly ONE short framing paragraph (60\u{2013}90 words)
- H2 must never start with H3, bullets, tables, or code
- Under each H2: 2\u{2013}5 H3 subsections
- Each H3: max 2 paragraphs, max ~120 words per paragraph
- Each H2 section max 3 paragraphs total (excluding tables)

BULLETS
- Required for lists, criteria, features, steps, comparisons
- Never bullet-only sections

TABLES
- Required when explaining comparisons, components, mappings, limits, configurations
- Use Markdown tables (not code blocks)

FAQ
- Non-opinionated
- Max 3 short lines per answer
- No bullets or tables

FACTUAL ACCURACY
- Do not invent numbers, limits, defaults, or guarantees
- If specifics vary, qualify with \"depends on configuration / region / setup\"
- Prefer neutral wording (\"is used for\", \"typically\", \"commonly\")
- Avoid marketing or subjective claims

BANNED WORDS
{banned_words}

Tone: {tonality}
Context: {context}
Theme: {theme}
Audience: {audience_persona}
",
        tonality = inputs.tonality,
        context = inputs.context,
        theme = inputs.theme,
        audience_persona = inputs.audience_persona,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> StyleInputs {
        StyleInputs {
            tonality: "Clear, direct, neutral, factual.".into(),
            context: "Written for experienced professionals.".into(),
            theme: "Clarity, accuracy, practical understanding.".into(),
            audience_persona: "Senior practitioners".into(),
            banned_words: vec!["seamless".into(), "game-changer".into(), "unlock".into()],
        }
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let inputs = sample_inputs();
        assert_eq!(compile_style_rules(&inputs), compile_style_rules(&inputs));
    }

    #[test]
    fn banned_words_rendered_verbatim_comma_space_joined() {
        let rules = compile_style_rules(&sample_inputs());
        assert!(rules.contains("seamless, game-changer, unlock"));
    }

    #[test]
    fn free_text_fields_rendered_verbatim() {
        let rules = compile_style_rules(&sample_inputs());
        assert!(rules.contains("Tone: Clear, direct, neutral, factual."));
        assert!(rules.contains("Context: Written for experienced professionals."));
        assert!(rules.contains("Theme: Clarity, accuracy, practical understanding."));
        assert!(rules.contains("Audience: Senior practitioners"));
    }

    #[test]
    fn fixed_sections_always_present() {
        let rules = compile_style_rules(&StyleInputs::default());
        assert!(rules.contains("GLOBAL CONTENT RULES"));
        assert!(rules.contains("BULLETS"));
        assert!(rules.contains("TABLES"));
        assert!(rules.contains("FAQ"));
        assert!(rules.contains("FACTUAL ACCURACY"));
        assert!(rules.contains("BANNED WORDS"));
    }

    #[test]
    fn empty_inputs_are_accepted() {
        let rules = compile_style_rules(&StyleInputs::default());
        assert!(rules.contains("Tone: \n"));
        assert!(rules.contains("BANNED WORDS\n\n"));
    }
}
