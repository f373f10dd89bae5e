//! Prompt builders for the four chained generation stages.
//!
//! Pure string templating. Each prompt stands alone: the generation service
//! is stateless with no conversation memory across stages, so every prompt
//! carries the style rules and constraints it needs.

use contentforge_shared::CompetitorOutline;

/// Render competitor outlines as a text block for prompt embedding.
pub fn render_outlines(outlines: &[CompetitorOutline]) -> String {
    if outlines.is_empty() {
        return "(no competitor outlines available)".to_string();
    }

    let mut block = String::new();
    for outline in outlines {
        block.push_str(&outline.url);
        block.push('\n');
        if outline.headings.is_empty() {
            block.push_str("  (no headings extracted)\n");
        }
        for heading in &outline.headings {
            block.push_str("  ");
            block.push_str(heading.level.markdown_prefix());
            block.push(' ');
            block.push_str(&heading.text);
            block.push('\n');
        }
        block.push('\n');
    }
    block.trim_end().to_string()
}

/// Render the must-include entity list for prompt embedding.
pub fn render_entities(entities: &[String]) -> String {
    if entities.is_empty() {
        return "(no required entities)".to_string();
    }
    entities.join(", ")
}

/// Prompt for the outline generation stage.
pub fn outline_prompt(
    topic: &str,
    tonality: &str,
    context: &str,
    theme: &str,
    style_rules: &str,
    competitor_outlines: &[CompetitorOutline],
    entities: &[String],
) -> String {
    format!(
        "\
Create a neutral, production-ready article outline.

Topic: {topic}

Tone: {tonality}
Context: {context}
Theme: {theme}

{style_rules}

Competitor coverage:
{outlines}

Important entities to cover naturally:
{entities}

Outline requirements:
- H1 once
- Each H2 must have multiple H3 subsections
- Introduce tables where comparisons or mappings exist
- Do not force sections that are not relevant
- Include a decision/fit section
- End with FAQs (4\u{2013}6)

Return ONLY Markdown outline.
",
        outlines = render_outlines(competitor_outlines),
        entities = render_entities(entities),
    )
}

/// Prompt for the full article generation stage.
pub fn article_prompt(
    topic: &str,
    audience_persona: &str,
    style_rules: &str,
    entities: &[String],
    outline: &str,
) -> String {
    format!(
        "\
Write the full article using the outline below.

Topic: {topic}
Audience: {audience_persona}

{style_rules}

Entities to include naturally:
{entities}

Outline:
{outline}

STRUCTURE ENFORCEMENT
- Every H2 starts with one framing paragraph
- Use H3 subsections for depth
- Insert tables where comparison/mapping is implied
- Insert bullets when listing items
- Do not exceed 3 paragraphs per section
- No speculation, no invented specifics

Return ONLY Markdown article.
",
        entities = render_entities(entities),
    )
}

/// Prompt for the conditional long-paragraph refactor stage.
pub fn refactor_prompt(article: &str) -> String {
    format!(
        "\
Refactor the article below:
- Split long paragraphs
- Add H3 subsections where needed
- Preserve facts and structure

Article:
{article}

Return ONLY revised Markdown.
"
    )
}

/// Prompt for the final polish stage.
pub fn polish_prompt(article: &str) -> String {
    format!(
        "\
Improve clarity and readability without changing meaning.

Rules:
- Preserve structure
- No new claims
- No marketing language
- Remove banned words
- Keep paragraphs concise

Article:
{article}

Return ONLY revised Markdown.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentforge_shared::{Heading, HeadingLevel};

    fn sample_outlines() -> Vec<CompetitorOutline> {
        vec![
            CompetitorOutline {
                url: "https://a.example.com/streaming".into(),
                headings: vec![
                    Heading {
                        level: HeadingLevel::H1,
                        text: "Streaming Analytics".into(),
                    },
                    Heading {
                        level: HeadingLevel::H2,
                        text: "Key Concepts".into(),
                    },
                ],
            },
            CompetitorOutline {
                url: "https://b.example.com/failed".into(),
                headings: vec![],
            },
        ]
    }

    #[test]
    fn render_outlines_includes_urls_and_markers() {
        let block = render_outlines(&sample_outlines());
        assert!(block.contains("https://a.example.com/streaming"));
        assert!(block.contains("# Streaming Analytics"));
        assert!(block.contains("## Key Concepts"));
        assert!(block.contains("(no headings extracted)"));
    }

    #[test]
    fn render_outlines_empty_placeholder() {
        assert_eq!(render_outlines(&[]), "(no competitor outlines available)");
    }

    #[test]
    fn render_entities_joined_or_placeholder() {
        let entities = vec!["kafka".to_string(), "flink".to_string()];
        assert_eq!(render_entities(&entities), "kafka, flink");
        assert_eq!(render_entities(&[]), "(no required entities)");
    }

    #[test]
    fn outline_prompt_threads_all_constraints() {
        let entities = vec!["kafka".to_string()];
        let prompt = outline_prompt(
            "streaming analytics",
            "neutral",
            "for data engineers",
            "clarity",
            "STYLE RULES BLOCK",
            &sample_outlines(),
            &entities,
        );

        assert!(prompt.contains("Topic: streaming analytics"));
        assert!(prompt.contains("STYLE RULES BLOCK"));
        assert!(prompt.contains("Competitor coverage:"));
        assert!(prompt.contains("kafka"));
        assert!(prompt.contains("Return ONLY Markdown outline."));
    }

    #[test]
    fn article_prompt_embeds_outline_verbatim() {
        let prompt = article_prompt(
            "streaming analytics",
            "senior practitioners",
            "STYLE RULES BLOCK",
            &[],
            "# Outline\n## Section",
        );

        assert!(prompt.contains("# Outline\n## Section"));
        assert!(prompt.contains("(no required entities)"));
        assert!(prompt.contains("STRUCTURE ENFORCEMENT"));
    }

    #[test]
    fn refactor_and_polish_prompts_carry_article() {
        let article = "## Heavy Section\nvery long text";
        assert!(refactor_prompt(article).contains(article));
        assert!(polish_prompt(article).contains(article));
        assert!(polish_prompt(article).contains("Remove banned words"));
    }
}
