//! # Markdown Protection
//!
//! Syntax that would confuse sentence-boundary detection (the period inside a
//! URL, the lines of a code block) is swapped for opaque placeholders before
//! segmentation and swapped back afterwards.
//!
//! ## Pattern families, in priority order
//!
//! 1. fenced code blocks
//! 2. URLs (one level of balanced parentheses)
//! 3. horizontal rules
//! 4. wikilinks
//! 5. markdown links
//!
//! Matches are sorted by start and a match overlapping an earlier one is
//! dropped, so a URL inside a code block stays part of the code block.
//!
//! ## Placeholders
//!
//! `U+E000` + family tag + counter + `U+E000`, counter strictly increasing in
//! text order. The tag is upper case so a placeholder opening a sentence is
//! seen as the start of a new sentence.

mod patterns;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::text::{EditMap, Span, first_wins, rewrite};

/// Delimiter around every placeholder.
pub const PLACEHOLDER_DELIMITER: char = '\u{E000}';

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{E000}([A-Z]+)([0-9]+)\u{E000}").expect("Invalid placeholder regex")
});

/// The syntax family a protected region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionKind {
    CodeFence,
    Url,
    HorizontalRule,
    WikiLink,
    MarkdownLink,
}

impl ProtectionKind {
    pub fn tag(self) -> &'static str {
        match self {
            ProtectionKind::CodeFence => "CODE",
            ProtectionKind::Url => "URL",
            ProtectionKind::HorizontalRule => "RULE",
            ProtectionKind::WikiLink => "WIKI",
            ProtectionKind::MarkdownLink => "LINK",
        }
    }
}

/// One protected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedContent {
    pub kind: ProtectionKind,
    pub placeholder: String,
    pub original: String,
    /// Offset of `original` in the text handed to [`protect`].
    pub start_offset: usize,
}

/// Result of [`protect`].
#[derive(Debug, Clone)]
pub struct Protected {
    /// Text with every protected region replaced by its placeholder.
    pub text: String,
    /// Indexed by placeholder counter.
    pub contents: Vec<ProtectedContent>,
    /// Protected → unprotected offsets.
    pub map: EditMap,
}

/// Replaces protectable syntax in `text` with placeholders.
pub fn protect(text: &str) -> Protected {
    let survivors = first_wins(patterns::find_candidates(text));

    let contents: Vec<ProtectedContent> = survivors
        .iter()
        .enumerate()
        .map(|(counter, candidate)| ProtectedContent {
            kind: candidate.kind,
            placeholder: placeholder(candidate.kind, counter),
            original: candidate.span.slice(text).to_string(),
            start_offset: candidate.span.start,
        })
        .collect();

    let replacements: Vec<(Span, &str)> = survivors
        .iter()
        .zip(&contents)
        .map(|(candidate, content)| (candidate.span, content.placeholder.as_str()))
        .collect();
    let (protected, map) = rewrite(text, &replacements);

    log::debug!("protected {} regions", contents.len());
    Protected {
        text: protected,
        contents,
        map,
    }
}

fn placeholder(kind: ProtectionKind, counter: usize) -> String {
    format!(
        "{PLACEHOLDER_DELIMITER}{}{counter}{PLACEHOLDER_DELIMITER}",
        kind.tag()
    )
}

impl Protected {
    /// Replaces every placeholder in `fragment` (any slice of the protected
    /// text, or text derived from it) with its original content. Unknown
    /// placeholders are left as they are.
    pub fn restore(&self, fragment: &str) -> String {
        if !fragment.contains(PLACEHOLDER_DELIMITER) {
            return fragment.to_string();
        }
        PLACEHOLDER
            .replace_all(fragment, |caps: &Captures<'_>| {
                self.lookup(caps)
                    .map_or_else(|| caps[0].to_string(), |c| c.original.clone())
            })
            .into_owned()
    }

    /// Restores the whole protected text.
    pub fn restore_all(&self) -> String {
        self.restore(&self.text)
    }

    /// The protected region `fragment` consists of, if it is exactly one
    /// placeholder (surrounding whitespace ignored).
    pub fn sole_content(&self, fragment: &str) -> Option<&ProtectedContent> {
        let caps = PLACEHOLDER.captures(fragment.trim())?;
        (caps.get(0)?.as_str().len() == fragment.trim().len())
            .then(|| self.lookup(&caps))
            .flatten()
    }

    fn lookup(&self, caps: &Captures<'_>) -> Option<&ProtectedContent> {
        let counter: usize = caps.get(2)?.as_str().parse().ok()?;
        let content = self.contents.get(counter)?;
        (content.kind.tag() == caps.get(1)?.as_str()).then_some(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Kein Markdown hier. Nur Sätze.")]
    #[case("```rust\nfn main() { println!(\"a. b\"); }\n```\nDanach.")]
    #[case("Siehe https://example.com/path?q=1&r=(2). Weiter.")]
    #[case("Oben.\n\n---\n\nUnten.")]
    #[case("Ein [[Link|Alias]] und [md](https://a.b/c_(d)) und www.test.de!")]
    #[case("~~~\nunterminated https://x.y\n")]
    #[case("")]
    fn restore_inverts_protect(#[case] text: &str) {
        let protected = protect(text);
        assert_eq!(protected.restore_all(), text);
    }

    #[test]
    fn code_fence_wins_over_url_inside_it() {
        let protected = protect("```\nhttps://inside.example\n```");
        assert_eq!(protected.contents.len(), 1);
        assert_eq!(protected.contents[0].kind, ProtectionKind::CodeFence);
    }

    #[test]
    fn markdown_link_wins_over_its_url() {
        let protected = protect("Lies [dies](https://a.de/x). Ende.");
        assert_eq!(protected.contents.len(), 1);
        assert_eq!(protected.contents[0].kind, ProtectionKind::MarkdownLink);
        assert_eq!(protected.text, "Lies \u{E000}LINK0\u{E000}. Ende.");
    }

    #[test]
    fn counters_strictly_increase_in_text_order() {
        let protected = protect("[[a]] https://b.de [[c]]");
        let placeholders: Vec<&str> = protected
            .contents
            .iter()
            .map(|c| c.placeholder.as_str())
            .collect();
        assert_eq!(
            placeholders,
            vec!["\u{E000}WIKI0\u{E000}", "\u{E000}URL1\u{E000}", "\u{E000}WIKI2\u{E000}"]
        );
        assert_eq!(protected.contents[1].start_offset, 6);
    }

    #[test]
    fn offsets_inside_placeholders_collapse_to_original_start() {
        let text = "A https://example.com/x B";
        let protected = protect(text);
        let inside = protected.text.find("URL").unwrap_or_default();
        assert_eq!(protected.map.to_source(inside), 2);
        let b = protected.text.find('B').unwrap_or_default();
        assert_eq!(protected.map.to_source(b), text.find('B').unwrap_or_default());
    }

    #[test]
    fn sole_content_detects_standalone_placeholder() {
        let protected = protect("https://example.com\n\nText.");
        let first_line = protected.text.lines().next().unwrap_or_default();
        assert_eq!(
            protected.sole_content(first_line).map(|c| c.kind),
            Some(ProtectionKind::Url)
        );
        assert!(protected.sole_content("Text.").is_none());
    }

    #[test]
    fn restore_fragment_of_protected_text() {
        let protected = protect("Ein Satz mit [[Link]]. Noch einer.");
        let first = protected.text.split(". ").next().unwrap_or_default();
        assert_eq!(protected.restore(first), "Ein Satz mit [[Link]]");
    }
}
