//! # Offset Remapping
//!
//! Every text transform in the pipeline (heading removal, placeholder
//! protection, decoration stripping) is a list of non-overlapping replacements.
//! [`rewrite`] applies such a list and records it as an [`EditMap`], which maps
//! offsets in the rewritten text back into the text it was produced from.
//!
//! Mapping rules, for an offset in the rewritten ("target") text:
//! - inside a replacement: collapses to the start of the replaced source range
//! - at or after the end of a replacement: shifted by the cumulative length
//!   delta of every replacement up to and including it
//!
//! A pure deletion has an empty target range, so an offset sitting exactly on
//! it maps to just past the deleted source bytes.

use super::span::Span;

/// One replacement: `source` bytes of the earlier text became `target` bytes
/// of the rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub source: Span,
    pub target: Span,
}

/// Backward offset map produced by a single rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditMap {
    /// Sorted by `target.start`, non-overlapping in both spaces.
    edits: Vec<Edit>,
}

impl EditMap {
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Maps an offset of the rewritten text back to the source text.
    pub fn to_source(&self, offset: usize) -> usize {
        let k = self.edits.partition_point(|e| e.target.start <= offset);
        match k.checked_sub(1).and_then(|i| self.edits.get(i)) {
            None => offset,
            Some(e) if offset < e.target.end => e.source.start,
            // offset >= target.end, so this cannot underflow
            Some(e) => offset - e.target.end + e.source.end,
        }
    }

    /// Maps a span of the rewritten text back to the source text.
    pub fn span_to_source(&self, span: Span) -> Span {
        Span::new(self.to_source(span.start), self.to_source(span.end))
    }
}

/// A sequence of edit maps applied innermost first, i.e. the first map
/// belongs to the last rewrite performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetChain<'a> {
    maps: [Option<&'a EditMap>; 3],
}

impl<'a> OffsetChain<'a> {
    pub fn new(maps: [Option<&'a EditMap>; 3]) -> Self {
        Self { maps }
    }

    /// Maps an offset of the innermost space back to the outermost one.
    pub fn to_original(&self, offset: usize) -> usize {
        self.maps
            .iter()
            .flatten()
            .fold(offset, |acc, map| map.to_source(acc))
    }

    pub fn span_to_original(&self, span: Span) -> Span {
        Span::new(self.to_original(span.start), self.to_original(span.end))
    }
}

/// Applies sorted, non-overlapping `replacements` to `text`.
///
/// Replacements that overlap an earlier one or do not fall on char
/// boundaries are skipped, so the function is total.
pub fn rewrite<S: AsRef<str>>(text: &str, replacements: &[(Span, S)]) -> (String, EditMap) {
    let mut out = String::with_capacity(text.len());
    let mut edits = Vec::with_capacity(replacements.len());
    let mut source_cursor = 0usize;

    for (source, replacement) in replacements {
        let replacement = replacement.as_ref();
        if source.start < source_cursor
            || source.end < source.start
            || !text.is_char_boundary(source.start)
            || !text.is_char_boundary(source.end)
        {
            log::trace!("skipping overlapping or misaligned edit {source:?}");
            continue;
        }
        out.push_str(&text[source_cursor..source.start]);
        let target_start = out.len();
        out.push_str(replacement);
        edits.push(Edit {
            source: *source,
            target: Span::new(target_start, out.len()),
        });
        source_cursor = source.end;
    }
    out.push_str(text.get(source_cursor..).unwrap_or(""));

    (out, EditMap { edits })
}
