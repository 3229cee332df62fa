//! # Sentence Segmenter
//!
//! UAX #29 sentence boundaries over protected, heading-filtered text, plus one
//! extra boundary kind: a speech-introducing colon (`:` + whitespace + quote
//! mark, uppercase letter or dash). The segmenter works on whatever coordinate
//! space it is handed and returns spans in that space.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{language::LanguageConfig, text::Span};

static COLON_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[ \t]+").expect("Invalid colon gap regex"));

/// Characters allowed after the terminal punctuation of a complete sentence.
const TRAILING_CLOSERS: &[char] = &[
    '"', '\'', '“', '”', '„', '»', '«', '’', ')', ']', '*', '_', '~', '=',
];

const TERMINALS: &[char] = &['.', '!', '?', '…'];

const MARKER_CHARS: &[char] = &['*', '_', '~', '='];

/// One sentence, in the coordinate space it was segmented in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceToken {
    /// Restored text: placeholders and decorations put back.
    pub text: String,
    /// Trimmed span in the segmented text.
    pub span: Span,
    /// Length of `text` in chars.
    pub char_count: usize,
    /// Ends with terminal punctuation, closing quotes or markers allowed after it.
    pub is_complete: bool,
}

impl SentenceToken {
    pub fn new(text: String, span: Span) -> Self {
        Self {
            char_count: text.chars().count(),
            is_complete: is_complete(&text),
            text,
            span,
        }
    }
}

/// Splits `text` into trimmed, non-empty sentence spans.
pub fn sentence_spans(text: &str, language: &LanguageConfig) -> Vec<Span> {
    let mut boundaries: BTreeSet<usize> = text
        .split_sentence_bound_indices()
        .map(|(start, _)| absorb_closing_markers(text, start))
        .collect();
    boundaries.extend(speech_intro_boundaries(text, language));
    boundaries.insert(text.len());

    let mut spans = Vec::with_capacity(boundaries.len());
    let mut start = 0usize;
    for end in boundaries.into_iter().filter(|&b| b > 0) {
        let raw = Span::new(start, end).slice(text);
        let leading = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let trimmed_start = start + leading;
            spans.push(Span::new(trimmed_start, trimmed_start + trimmed.len()));
        }
        start = end;
    }

    log::debug!("segmented {} sentences", spans.len());
    spans
}

/// UAX #29 has no notion of emphasis markers and breaks between `leise.` and
/// the `*` closing it. Moves such a boundary past the marker run when the run
/// is glued to the sentence and followed by whitespace.
fn absorb_closing_markers(text: &str, boundary: usize) -> usize {
    let (Some(before), Some(rest)) = (text.get(..boundary), text.get(boundary..)) else {
        return boundary;
    };
    let run = rest.len() - rest.trim_start_matches(MARKER_CHARS).len();
    let glued = before.chars().next_back().is_some_and(|c| !c.is_whitespace());
    let then_space = rest[run..].chars().next().is_none_or(char::is_whitespace);
    if run > 0 && glued && then_space {
        boundary + run
    } else {
        boundary
    }
}

/// Offsets right after the whitespace following a speech-introducing colon.
fn speech_intro_boundaries<'a>(
    text: &'a str,
    language: &'a LanguageConfig,
) -> impl Iterator<Item = usize> + 'a {
    COLON_GAP.find_iter(text).filter_map(move |gap| {
        let next = text[gap.end()..].chars().next()?;
        let introduces_speech = language.is_quote(next)
            || next.is_uppercase()
            || matches!(next, '-' | '–' | '—' | '‚' | '‘' | '»' | '«');
        introduces_speech.then_some(gap.end())
    })
}

/// True if `text` ends with terminal punctuation, optionally followed by
/// closing quotes, brackets or emphasis markers.
pub fn is_complete(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(TRAILING_CLOSERS)
        .ends_with(TERMINALS)
}
