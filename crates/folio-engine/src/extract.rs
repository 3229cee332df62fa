//! # Heading Extraction
//!
//! Headings are lifted out of the text before sentence segmentation so that a
//! heading never fuses with the sentence after it. The heading text is removed
//! but its newline is kept, which preserves blank-line paragraph detection.
//! The resulting [`EditMap`] maps filtered offsets back to the original.
//!
//! Horizontal rules are not extracted here: they survive segmentation as
//! degenerate sentences and are filtered by the pipeline instead.

use crate::{
    kinds::FenceTracker,
    scan::ScannedLine,
    text::{EditMap, Span, rewrite},
};

/// A heading lifted out of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHeading {
    /// Heading line without the newline.
    pub text: String,
    pub start_offset: usize,
    /// End offset including the newline.
    pub end_offset: usize,
    pub line_number: usize,
}

/// Text with headings removed plus everything needed to put them back.
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    pub headings: Vec<ExtractedHeading>,
    /// Original text with every heading's text deleted (newlines kept).
    pub filtered: String,
    /// Filtered → original offsets.
    pub map: EditMap,
}

/// Extracts headings from the scanned lines of `text`. Heading-shaped lines
/// inside fenced code blocks are left alone.
pub fn extract_headings(text: &str, lines: &[ScannedLine]) -> HeadingFilter {
    let mut fences = FenceTracker::default();
    let headings: Vec<ExtractedHeading> = lines
        .iter()
        .filter(|line| !fences.step(&line.text) && line.is_heading)
        .map(|line| ExtractedHeading {
            text: line.text.clone(),
            start_offset: line.span.start,
            end_offset: line.span.end,
            line_number: line.line_number,
        })
        .collect();

    let removals: Vec<(Span, &str)> = headings
        .iter()
        .map(|h| (Span::new(h.start_offset, h.start_offset + h.text.len()), ""))
        .collect();
    let (filtered, map) = rewrite(text, &removals);

    log::debug!("extracted {} headings", headings.len());
    HeadingFilter {
        headings,
        filtered,
        map,
    }
}
