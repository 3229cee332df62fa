//! # Decoration Stripping and Restoration
//!
//! An emphasis span that straddles several sentences (`*One. Two.*`) would be
//! cut in half by segmentation. Such spans are stripped before segmentation
//! and every resulting sentence is re-wrapped individually afterwards, so
//! each output piece is balanced on its own.
//!
//! A span is stripped only when
//! - its payload contains a sentence boundary, or
//! - it sits whitespace-adjacent to a sibling with the same delimiter.
//!
//! An isolated single-sentence `*word*` is left alone.
//!
//! Unclosed delimiters are repaired beforehand by [`heal_unclosed`].

mod heal;
mod kinds;

pub use heal::heal_unclosed;
pub use kinds::Decoration;

use std::sync::LazyLock;

use regex::Regex;

use crate::text::{EditMap, Span, Spanned, first_wins, rewrite};

/// Terminal punctuation followed by whitespace and more text.
static INTERNAL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?…]["'“”„»«’)\]]*\s+\S"#).expect("Invalid sentence boundary regex")
});

/// A decoration span in the text it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationSpan {
    /// Start of the opening delimiter.
    pub start: usize,
    /// End of the closing delimiter.
    pub end: usize,
    pub decoration: Decoration,
    pub content_start: usize,
    pub content_end: usize,
}

impl DecorationSpan {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn content(&self) -> Span {
        Span::new(self.content_start, self.content_end)
    }
}

impl Spanned for DecorationSpan {
    fn span(&self) -> Span {
        DecorationSpan::span(self)
    }
}

/// Finds the spans of `text` that need stripping.
pub fn find_spans(text: &str) -> Vec<DecorationSpan> {
    let candidates: Vec<DecorationSpan> = Decoration::ALL
        .iter()
        .flat_map(|&decoration| {
            decoration
                .pattern()
                .captures_iter(text)
                .filter_map(move |caps| {
                    let whole = caps.get(0)?;
                    let payload = caps.get(1)?;
                    Some(DecorationSpan {
                        start: whole.start(),
                        end: whole.end(),
                        decoration,
                        content_start: payload.start(),
                        content_end: payload.end(),
                    })
                })
        })
        .filter(|span| !span.decoration.needs_word_boundary() || at_word_boundary(text, span))
        .collect();

    let spans = first_wins(candidates);
    let triggering: Vec<DecorationSpan> = spans
        .iter()
        .enumerate()
        .filter(|&(i, span)| {
            INTERNAL_BOUNDARY.is_match(span.content().slice(text))
                || has_adjacent_sibling(text, &spans, i)
        })
        .map(|(_, span)| *span)
        .collect();

    log::debug!(
        "{} decoration spans, {} straddle sentences or siblings",
        spans.len(),
        triggering.len()
    );
    triggering
}

fn at_word_boundary(text: &str, span: &DecorationSpan) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// True if a same-delimiter span lies next to `spans[i]`, separated only by
/// spaces or tabs.
fn has_adjacent_sibling(text: &str, spans: &[DecorationSpan], i: usize) -> bool {
    let Some(current) = spans.get(i) else {
        return false;
    };
    let separated_by_blanks = |gap: Span| {
        let between = gap.slice(text);
        !between.is_empty() && between.chars().all(|c| c == ' ' || c == '\t')
    };
    let previous = i
        .checked_sub(1)
        .and_then(|p| spans.get(p))
        .filter(|p| p.decoration == current.decoration)
        .is_some_and(|p| separated_by_blanks(Span::new(p.end, current.start)));
    let next = spans
        .get(i + 1)
        .filter(|n| n.decoration == current.decoration)
        .is_some_and(|n| separated_by_blanks(Span::new(current.end, n.start)));
    previous || next
}

/// A stripped span with its payload located in the stripped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrippedSpan {
    pub original: DecorationSpan,
    /// Payload range in the stripped text.
    pub content: Span,
}

/// Text with straddling decorations removed.
#[derive(Debug, Clone)]
pub struct Stripped {
    pub text: String,
    pub spans: Vec<StrippedSpan>,
    /// Stripped → unstripped offsets.
    pub map: EditMap,
}

/// Removes both delimiters of every span, keeping the payload.
pub fn strip(text: &str, spans: &[DecorationSpan]) -> Stripped {
    let mut removals: Vec<(Span, &str)> = Vec::with_capacity(spans.len() * 2);
    let mut stripped_spans = Vec::with_capacity(spans.len());
    let mut removed = 0usize;

    for span in spans {
        let open = Span::new(span.start, span.content_start);
        let close = Span::new(span.content_end, span.end);
        removed += open.len();
        let content_start = span.content_start - removed;
        stripped_spans.push(StrippedSpan {
            original: *span,
            content: Span::new(content_start, content_start + span.content().len()),
        });
        removed += close.len();
        removals.push((open, ""));
        removals.push((close, ""));
    }

    let (stripped, map) = rewrite(text, &removals);
    Stripped {
        text: stripped,
        spans: stripped_spans,
        map,
    }
}

/// A sentence with its decorations put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredSentence {
    pub text: String,
    /// Set when restoration wrapped the whole sentence in this decoration.
    pub wrapped_in: Option<Decoration>,
}

impl Stripped {
    /// Re-wraps the part of `sentence` (a trimmed span of the stripped text)
    /// that falls inside each stripped span. Pieces already balanced on their
    /// own are not wrapped again.
    pub fn restore(&self, sentence: Span) -> RestoredSentence {
        let base = sentence.slice(&self.text);
        let mut inserts: Vec<(usize, bool, &'static str)> = Vec::new();
        let mut wrapped_in = None;

        for stripped in self.spans.iter().filter(|s| s.content.overlaps(sentence)) {
            let Some(piece) = stripped
                .content
                .intersect(sentence)
                .map(|s| trim_span(&self.text, s))
                .filter(|s| !s.is_empty())
            else {
                continue;
            };
            let marker = stripped.original.decoration.marker();
            let piece_text = piece.slice(&self.text);
            if piece_text.len() >= marker.len() * 2
                && piece_text.starts_with(marker)
                && piece_text.ends_with(marker)
            {
                continue;
            }
            if piece == sentence {
                wrapped_in = Some(stripped.original.decoration);
            }
            // closers sort before openers at the same offset
            inserts.push((piece.start - sentence.start, true, marker));
            inserts.push((piece.end - sentence.start, false, marker));
        }

        if inserts.is_empty() {
            return RestoredSentence {
                text: base.to_string(),
                wrapped_in: None,
            };
        }

        inserts.sort_by_key(|&(offset, is_open, _)| (offset, is_open));
        let mut text = String::with_capacity(base.len() + inserts.len() * 2);
        let mut cursor = 0usize;
        for (offset, _, marker) in inserts {
            text.push_str(base.get(cursor..offset).unwrap_or(""));
            text.push_str(marker);
            cursor = offset;
        }
        text.push_str(base.get(cursor..).unwrap_or(""));

        RestoredSentence { text, wrapped_in }
    }
}

/// Shrinks `span` so it neither starts nor ends with whitespace.
fn trim_span(text: &str, span: Span) -> Span {
    let slice = span.slice(text);
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    if leading + trailing >= slice.len() {
        return Span::new(span.start, span.start);
    }
    Span::new(span.start + leading, span.end - trailing)
}

/// Appends `next` to `out` after `gap`. When the previous sentence and
/// `next` were both wholly wrapped in the same decoration, the inner
/// delimiters collapse: `*a.*` + `*b.*` becomes `*a. b.*`.
pub fn join_restored(
    out: &mut String,
    previous: Option<Decoration>,
    gap: &str,
    next: &str,
    next_wrapped_in: Option<Decoration>,
) {
    match (previous, next_wrapped_in) {
        (Some(prev), Some(cur)) if prev == cur && out.ends_with(prev.marker()) => {
            out.truncate(out.len() - prev.marker().len());
            out.push_str(gap);
            out.push_str(next.get(cur.marker().len()..).unwrap_or(""));
        }
        _ => {
            out.push_str(gap);
            out.push_str(next);
        }
    }
}
