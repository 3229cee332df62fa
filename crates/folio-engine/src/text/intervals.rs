use super::span::Span;

/// Anything carrying a span that takes part in overlap resolution.
pub trait Spanned {
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Keeps the first of any overlapping matches.
///
/// Matches are ordered by start; for equal starts the caller's order decides,
/// which lets pattern families earlier in the list win ties. A later match
/// that overlaps an already kept one is dropped.
pub fn first_wins<T: Spanned>(mut matches: Vec<T>) -> Vec<T> {
    // stable sort keeps family order for equal starts
    matches.sort_by_key(|m| m.span().start);
    let mut kept: Vec<T> = Vec::with_capacity(matches.len());
    for m in matches {
        let span = m.span();
        if span.is_empty() {
            continue;
        }
        match kept.last() {
            Some(last) if last.span().end > span.start => {}
            _ => kept.push(m),
        }
    }
    kept
}
