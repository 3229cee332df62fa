//! # Context Annotator
//!
//! Attaches the context both groupers decide on: quote depth, verse
//! membership, paragraph starts and the region a sentence belongs to.
//!
//! Quote depth is taken from the line a sentence starts on (the depth carried
//! into that line), not from the exact character offset.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    decoration::Decoration,
    language::LanguageConfig,
    pipeline::{Prepared, PreparedSentence},
    scan::{ScannedLine, line_spans},
    sentence::SentenceToken,
    text::{Span, line_index_at},
};

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("Invalid blank line regex"));

/// A run of sentences that must not be separated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    Poem,
    MultilineQuote,
    SpeechIntro,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSentence {
    pub token: SentenceToken,
    /// Span in the original text.
    pub original: Span,
    /// Depth carried into the start of the sentence's line.
    pub quote_depth: usize,
    pub is_poem: bool,
    pub starts_new_paragraph: bool,
    pub region: Region,
    /// 0-based line the sentence starts on.
    pub line_number: usize,
    /// A quote is still open at the end of the sentence's line.
    pub continues_quote: bool,
    /// The sentence closes its line and the line ends in a hard break.
    pub ends_with_hard_break: bool,
    /// Index of the multi-sentence decoration span the sentence lies in.
    pub decoration: Option<usize>,
    pub wrapped_in: Option<Decoration>,
    pub is_standalone_url: bool,
    /// Whitespace separating the sentence from its predecessor.
    pub gap_before: String,
}

impl AnnotatedSentence {
    pub fn text(&self) -> &str {
        &self.token.text
    }
}

/// Per-line verse facts: stanzas are maximal runs of non-blank, non-heading
/// lines.
struct Stanzas {
    /// For each line, whether its stanza has at least two verse candidate
    /// lines.
    verse_shaped: Vec<bool>,
}

impl Stanzas {
    fn new(lines: &[ScannedLine]) -> Self {
        let mut verse_shaped = vec![false; lines.len()];
        let mut start = 0usize;
        while start < lines.len() {
            if !lines.get(start).is_some_and(in_stanza) {
                start += 1;
                continue;
            }
            let len = lines[start..].iter().take_while(|l| in_stanza(l)).count();
            let candidates = lines[start..start + len]
                .iter()
                .filter(|l| l.is_potential_poem_line)
                .count();
            if candidates >= 2 {
                verse_shaped[start..start + len].fill(true);
            }
            start += len;
        }
        Self { verse_shaped }
    }
}

fn in_stanza(line: &ScannedLine) -> bool {
    !line.is_blank && !line.is_heading
}

/// Annotates every prepared sentence.
pub fn annotate(prepared: &Prepared, language: &LanguageConfig) -> Vec<AnnotatedSentence> {
    let spans = line_spans(&prepared.lines);
    let stanzas = Stanzas::new(&prepared.lines);
    let mut out: Vec<AnnotatedSentence> = Vec::with_capacity(prepared.sentences.len());

    for (i, sentence) in prepared.sentences.iter().enumerate() {
        let line_index = line_index_at(&spans, sentence.original.start);
        let Some(line) = prepared.lines.get(line_index) else {
            continue;
        };
        let end_index = line_index_at(&spans, sentence.original.end.saturating_sub(1));
        let end_line = prepared.lines.get(end_index).unwrap_or(line);

        let has_break = language.has_line_break(end_line.text.trim_end_matches('\r'));
        let rest_of_line = Span::new(
            sentence.original.end,
            end_line.span.start + end_line.text.len(),
        )
        .slice(&prepared.original);
        let is_poem = has_break
            || language.has_line_break(line.text.trim_end_matches('\r'))
            || (line.is_potential_poem_line
                && stanzas.verse_shaped.get(line_index).copied().unwrap_or(false));

        let mut annotated = AnnotatedSentence {
            token: sentence.token.clone(),
            original: sentence.original,
            quote_depth: line.quote_depth_before,
            is_poem,
            starts_new_paragraph: i == 0 || starts_paragraph(sentence),
            region: Region::None,
            line_number: line.line_number,
            continues_quote: end_line.leaves_quote_open(),
            ends_with_hard_break: has_break && rest_of_line.trim().is_empty(),
            decoration: sentence.decoration,
            wrapped_in: sentence.wrapped_in,
            is_standalone_url: sentence.is_standalone_url,
            gap_before: sentence.gap_before.clone(),
        };
        annotated.region = region_for(out.last(), &annotated, line);
        log::trace!(
            "sentence {i}: depth {} poem {} paragraph {} region {:?}",
            annotated.quote_depth,
            annotated.is_poem,
            annotated.starts_new_paragraph,
            annotated.region
        );
        out.push(annotated);
    }

    log::debug!(
        "annotated {} sentences, {} in regions",
        out.len(),
        out.iter().filter(|s| s.region != Region::None).count()
    );
    out
}

fn starts_paragraph(sentence: &PreparedSentence) -> bool {
    sentence.follows_pass_through
        || BLANK_LINE.is_match(&sentence.gap_before)
        || !sentence.gap_before.trim().is_empty()
}

/// Continues the predecessor's region while its membership rule holds,
/// otherwise decides which region (if any) the sentence opens.
fn region_for(
    previous: Option<&AnnotatedSentence>,
    current: &AnnotatedSentence,
    line: &ScannedLine,
) -> Region {
    let inside_quote = current.quote_depth > 0 || line.leaves_quote_open();
    if let Some(previous) = previous {
        match previous.region {
            Region::Poem if previous.is_poem && current.is_poem => return Region::Poem,
            Region::MultilineQuote
                if inside_quote || previous.line_number == current.line_number =>
            {
                return Region::MultilineQuote;
            }
            _ => {}
        }
    }
    if current.is_poem {
        Region::Poem
    } else if inside_quote {
        Region::MultilineQuote
    } else if current.text().trim_end().ends_with(':') {
        Region::SpeechIntro
    } else {
        Region::None
    }
}
