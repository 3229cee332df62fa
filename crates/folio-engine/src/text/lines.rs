use super::span::Span;

/// A reference to a single line of a text with its byte span.
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    /// 0-based line number.
    pub number: usize,
    /// Byte span of this line in the text (includes the newline if present).
    pub span: Span,
    /// The line text without its trailing `\n` (a `\r` is kept).
    pub text: &'a str,
}

impl LineRef<'_> {
    /// Span of the line content, excluding the newline.
    pub fn content_span(&self) -> Span {
        Span::new(self.span.start, self.span.start + self.text.len())
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Splits on `\n` only and keeps track of the newline in the span, which is
/// what every offset computation downstream relies on. A trailing newline does
/// not produce an extra empty line; an empty text produces a single empty line.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split_inclusive('\n')
        .chain(text.is_empty().then_some(""))
        .enumerate()
        .map(move |(number, raw)| {
            let start = offset;
            offset += raw.len();
            LineRef {
                number,
                span: Span::new(start, offset),
                text: raw.strip_suffix('\n').unwrap_or(raw),
            }
        })
}

/// Finds the index of the line containing `offset`, given line spans sorted
/// by start. Offsets past the end resolve to the last line.
pub fn line_index_at(lines: &[Span], offset: usize) -> usize {
    lines
        .partition_point(|span| span.start <= offset)
        .saturating_sub(1)
}
