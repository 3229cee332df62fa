use std::sync::LazyLock;

use regex::Regex;

use crate::{
    kinds::{FenceTracker, HorizontalRule},
    text::{Span, Spanned, lines_with_spans},
};

use super::ProtectionKind;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:(?:https?|ftp)://|www\.)(?:[^\s()<>\[\]{}"“”„»«]|\([^\s()<>]*\))+"#)
        .expect("Invalid URL regex")
});

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HorizontalRule::LINE_PATTERN).expect("Invalid rule regex"));

static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[\[[^\[\]\n]+\]\]").expect("Invalid wikilink regex"));

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[[^\]\n]*\]\((?:[^()\n]|\([^()\n]*\))*\)").expect("Invalid link regex")
});

/// Sentence punctuation and emphasis markers at the very end of a match
/// belong to the prose, not the URL. Closing brackets never need trimming:
/// the pattern only admits balanced parentheses.
const URL_TRAILING: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '*', '_', '~'];

/// A candidate region to protect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub kind: ProtectionKind,
    pub span: Span,
}

impl Spanned for Candidate {
    fn span(&self) -> Span {
        self.span
    }
}

/// Collects candidates of every family, in family order.
pub(crate) fn find_candidates(text: &str) -> Vec<Candidate> {
    let mut out = fenced_code(text);
    out.extend(urls(text));
    out.extend(regex_family(text, &RULE, ProtectionKind::HorizontalRule));
    out.extend(regex_family(text, &WIKILINK, ProtectionKind::WikiLink));
    out.extend(regex_family(text, &MARKDOWN_LINK, ProtectionKind::MarkdownLink));
    out
}

/// Fenced code blocks, from the opening line to the end of the closing line
/// (its newline excluded). An unterminated fence runs to the end of the text.
fn fenced_code(text: &str) -> Vec<Candidate> {
    let mut tracker = FenceTracker::default();
    let mut out = Vec::new();
    let mut open_at: Option<usize> = None;

    for line in lines_with_spans(text) {
        let in_fence = tracker.step(line.text);
        match (open_at, in_fence) {
            (None, true) => open_at = Some(line.span.start),
            (Some(start), true) if !tracker.is_open() => {
                out.push(Candidate {
                    kind: ProtectionKind::CodeFence,
                    span: Span::new(start, line.content_span().end),
                });
                open_at = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open_at {
        let end = text.trim_end_matches(['\n', '\r']).len().max(start);
        out.push(Candidate {
            kind: ProtectionKind::CodeFence,
            span: Span::new(start, end),
        });
    }
    out
}

fn urls(text: &str) -> Vec<Candidate> {
    URL.find_iter(text)
        .filter_map(|m| {
            let trimmed = m.as_str().trim_end_matches(URL_TRAILING);
            let span = Span::new(m.start(), m.start() + trimmed.len());
            (!span.is_empty()).then_some(Candidate {
                kind: ProtectionKind::Url,
                span,
            })
        })
        .collect()
}

fn regex_family(text: &str, re: &Regex, kind: ProtectionKind) -> Vec<Candidate> {
    re.find_iter(text)
        .map(|m| Candidate {
            kind,
            span: Span::new(m.start(), m.end()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn found(text: &str, kind: ProtectionKind) -> Vec<&str> {
        find_candidates(text)
            .into_iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.span.slice(text))
            .collect()
    }

    #[test]
    fn url_without_trailing_sentence_punctuation() {
        assert_eq!(
            found("Siehe https://example.com/a?b=1&c=2. Dann", ProtectionKind::Url),
            vec!["https://example.com/a?b=1&c=2"]
        );
    }

    #[test]
    fn url_with_balanced_parentheses() {
        assert_eq!(
            found(
                "(see https://en.wikipedia.org/wiki/Rust_(language))",
                ProtectionKind::Url
            ),
            vec!["https://en.wikipedia.org/wiki/Rust_(language)"]
        );
    }

    #[test]
    fn fence_spans_opening_to_closing_line() {
        let text = "Vorher.\n```\nlet x = 1. y\n```\nNachher.";
        assert_eq!(
            found(text, ProtectionKind::CodeFence),
            vec!["```\nlet x = 1. y\n```"]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let text = "Text.\n~~~\ncode\n";
        assert_eq!(found(text, ProtectionKind::CodeFence), vec!["~~~\ncode"]);
    }

    #[test]
    fn wikilinks_and_markdown_links() {
        let text = "Lies [[Kapitel 2|hier]] und [den Text](https://x.de/a_(b)).";
        assert_eq!(found(text, ProtectionKind::WikiLink), vec!["[[Kapitel 2|hier]]"]);
        assert_eq!(
            found(text, ProtectionKind::MarkdownLink),
            vec!["[den Text](https://x.de/a_(b))"]
        );
    }

    #[test]
    fn rules_are_whole_lines() {
        let text = "A.\n\n* * *\n\nB.";
        assert_eq!(found(text, ProtectionKind::HorizontalRule), vec!["* * *"]);
    }
}
