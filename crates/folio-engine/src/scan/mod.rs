//! # Quote-Depth Line Scanner
//!
//! Single pass over the text, one [`ScannedLine`] per `\n`-separated line.
//! Each line carries local facts (blank, heading, verse candidate) plus the
//! nested-quote state before and after it.
//!
//! ## Quote tracking
//!
//! Per character, against the [`LanguageConfig`] quote classes:
//! - opening glyph: push
//! - closing glyph: pop (a no-op at depth 0)
//! - neutral glyph: closes if a quote is open, else opens
//!
//! Neutral glyphs toggle because some scripts use one glyph for both roles.
//! Malformed quoting degrades through clamping and never fails.

mod quote_state;

pub use quote_state::QuoteState;

use crate::{
    kinds::Heading,
    language::LanguageConfig,
    text::{Span, lines_with_spans},
};

/// Local facts about one line of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 0-based line number.
    pub line_number: usize,
    /// Byte span including the newline.
    pub span: Span,
    /// Line text without the newline.
    pub text: String,
    pub is_blank: bool,
    pub is_heading: bool,
    /// Ends in a hard line break, or is shorter than the verse threshold.
    pub is_potential_poem_line: bool,
    /// Depth carried into the start of this line.
    pub quote_depth_before: usize,
    /// Quote state at the end of this line.
    pub quote_state_after: QuoteState,
}

impl ScannedLine {
    /// True if a quotation opened on or before this line is still open after it.
    pub fn leaves_quote_open(&self) -> bool {
        self.quote_state_after.depth() > 0
    }
}

/// Scans `text` line by line. Always succeeds.
pub fn scan_lines(text: &str, language: &LanguageConfig) -> Vec<ScannedLine> {
    let mut state = QuoteState::default();
    let lines: Vec<ScannedLine> = lines_with_spans(text)
        .map(|line| {
            let quote_depth_before = state.depth();
            state = state.advance_line(line.text, language);
            let trimmed = line.text.trim();
            let is_blank = trimmed.is_empty();
            ScannedLine {
                line_number: line.number,
                span: line.span,
                text: line.text.to_string(),
                is_blank,
                is_heading: Heading::is_heading(line.text),
                is_potential_poem_line: !is_blank
                    && (language.has_line_break(line.text.trim_end_matches('\r'))
                        || trimmed.chars().count() < language.poem_max_line_chars),
                quote_depth_before,
                quote_state_after: state.clone(),
            }
        })
        .collect();

    log::debug!(
        "scanned {} lines, {} headings, final quote depth {}",
        lines.len(),
        lines.iter().filter(|l| l.is_heading).count(),
        state.depth()
    );
    lines
}

/// Byte spans of the scanned lines, for offset → line lookups.
pub fn line_spans(lines: &[ScannedLine]) -> Vec<Span> {
    lines.iter().map(|l| l.span).collect()
}
