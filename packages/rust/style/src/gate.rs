//! Long-paragraph gate.
//!
//! Deterministic check over generated Markdown that decides whether the
//! pipeline runs its single extra refactor pass.

use std::sync::LazyLock;

use regex::Regex;

/// Default word-count ceiling per paragraph.
pub const DEFAULT_WORD_LIMIT: usize = 130;

/// Paragraphs are delimited by one or more blank lines (lines containing
/// only whitespace).
static PARAGRAPH_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

/// True iff any non-heading paragraph exceeds `word_limit` words.
///
/// A paragraph whose trimmed content starts with a heading marker is exempt
/// regardless of length. Word count is the number of whitespace-delimited
/// tokens — no punctuation-aware tokenization.
pub fn has_long_paragraph(markdown: &str, word_limit: usize) -> bool {
    for paragraph in PARAGRAPH_SPLIT.split(markdown) {
        if paragraph.trim_start().starts_with('#') {
            continue;
        }

        if paragraph.split_whitespace().count() > word_limit {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paragraphs_pass() {
        let markdown = "# Title\n\nShort paragraph one.\n\nShort paragraph two.";
        assert!(!has_long_paragraph(markdown, DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn long_paragraph_after_short_ones_triggers() {
        let markdown = format!("# Title\n\nShort para.\n\n{}", "word ".repeat(150));
        assert!(has_long_paragraph(&markdown, DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn at_limit_does_not_trigger() {
        let markdown = format!("## H2\n\n{}", "word ".repeat(100));
        assert!(!has_long_paragraph(&markdown, DEFAULT_WORD_LIMIT));

        let exactly_at = "word ".repeat(130);
        assert!(!has_long_paragraph(&exactly_at, DEFAULT_WORD_LIMIT));

        let one_over = "word ".repeat(131);
        assert!(one_over.split_whitespace().count() == 131);
        assert!(has_long_paragraph(&one_over, DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn headings_are_exempt_regardless_of_length() {
        let long_heading = format!("# {}", "word ".repeat(200));
        assert!(!has_long_paragraph(&long_heading, DEFAULT_WORD_LIMIT));

        // Leading whitespace before the marker still counts as a heading.
        let indented = format!("   ## {}", "word ".repeat(200));
        assert!(!has_long_paragraph(&indented, DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn blank_lines_with_whitespace_still_split() {
        let markdown = format!("Short para.\n  \t \n{}", "word ".repeat(150));
        assert!(has_long_paragraph(&markdown, DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn empty_input_passes() {
        assert!(!has_long_paragraph("", DEFAULT_WORD_LIMIT));
        assert!(!has_long_paragraph("\n\n\n", DEFAULT_WORD_LIMIT));
    }

    #[test]
    fn headings_only_document_passes() {
        let markdown = "# Title\n\n## Section\n\n### Subsection";
        assert!(!has_long_paragraph(markdown, DEFAULT_WORD_LIMIT));
    }
}
