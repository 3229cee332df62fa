//! Page accumulation: folds sentence groups into pages against the target and
//! max budgets, then slices the original text at the resulting cut points.

use crate::{config::SegmentationConfig, text::Span};

use super::region::SentenceGroup;

/// Non-splittable groups may stretch a page to this multiple of the max size.
/// Also bounds the one-group deferral of a cut.
pub const DEFERRAL_FACTOR: f64 = 1.5;

/// A group with its extent in the original text.
#[derive(Debug, Clone)]
pub(crate) struct PlacedGroup {
    pub span: Span,
    pub is_splittable: bool,
}

/// Char-count budgets resolved from the config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    pub target: usize,
    pub max: usize,
    pub stretched_max: usize,
}

impl Budget {
    pub fn from_config(config: &SegmentationConfig) -> Self {
        let max = config.effective_max();
        Self {
            target: config.effective_target(),
            max,
            // budgets are far below f64's exact integer range
            stretched_max: (max as f64 * DEFERRAL_FACTOR) as usize,
        }
    }
}

fn chars_in(original: &str, span: Span) -> usize {
    span.slice(original).chars().count()
}

/// Splits over-sized groups at sentence boundaries: splittable groups into
/// runs of at most `target`, non-splittable groups beyond the stretched max
/// into runs of at most `max`. A single over-sized sentence forms its own run.
pub(crate) fn pre_split(
    groups: &[SentenceGroup],
    original: &str,
    budget: Budget,
) -> Vec<PlacedGroup> {
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let spans: Vec<Span> = group.sentences.iter().map(|s| s.original).collect();
        let (Some(first), Some(last)) = (spans.first(), spans.last()) else {
            continue;
        };
        let whole = Span::new(first.start, last.end);
        let size = chars_in(original, whole);
        let run_limit = match group.is_splittable {
            true if size > budget.target => Some(budget.target),
            false if size > budget.stretched_max => Some(budget.max),
            _ => None,
        };
        let Some(limit) = run_limit else {
            out.push(PlacedGroup {
                span: whole,
                is_splittable: group.is_splittable,
            });
            continue;
        };

        log::trace!("pre-splitting a group of {size} chars into runs of {limit}");
        let mut run: Option<Span> = None;
        for span in spans {
            run = match run {
                Some(current)
                    if chars_in(original, Span::new(current.start, span.end)) <= limit =>
                {
                    Some(Span::new(current.start, span.end))
                }
                Some(current) => {
                    out.push(PlacedGroup {
                        span: current,
                        is_splittable: group.is_splittable,
                    });
                    Some(span)
                }
                None => Some(span),
            };
        }
        if let Some(current) = run {
            out.push(PlacedGroup {
                span: current,
                is_splittable: group.is_splittable,
            });
        }
    }
    out
}

/// Returns, per page, the index of its first group. A page is measured from
/// its cut point, so headings and pass-through items moved onto it count
/// towards its size.
pub(crate) fn accumulate(
    groups: &[PlacedGroup],
    original: &str,
    budget: Budget,
    movable_starts: &[usize],
) -> Vec<usize> {
    let mut page_starts = Vec::new();
    let mut page_start: Option<usize> = None;
    let mut deferred = false;

    for (i, group) in groups.iter().enumerate() {
        let Some(first) = page_start else {
            page_starts.push(i);
            page_start = Some(i);
            continue;
        };
        let start = cut_point(groups, first, movable_starts);
        let current_end = i
            .checked_sub(1)
            .and_then(|p| groups.get(p))
            .map_or(start, |g| g.span.end);
        let size_now = chars_in(original, Span::new(start, current_end));
        let size_with = chars_in(original, Span::new(start, group.span.end));
        let limit = if group.is_splittable {
            budget.max
        } else {
            budget.stretched_max
        };

        let reached_target = size_now >= budget.target;
        let defer = reached_target
            && !deferred
            && !group.is_splittable
            && size_with <= budget.stretched_max;
        let cut = (reached_target && !defer) || size_with > limit;
        if defer && !cut {
            log::trace!("deferring cut before atomic group {i}");
            deferred = true;
        }
        if cut {
            page_starts.push(i);
            page_start = Some(i);
            deferred = false;
        }
    }
    page_starts
}

/// Byte offset where the page opening with group `first` begins. The first
/// page begins at 0; any other page moves back to the earliest heading or
/// pass-through item lying between the previous group and its first one.
fn cut_point(groups: &[PlacedGroup], first: usize, movable_starts: &[usize]) -> usize {
    let previous = first.checked_sub(1).and_then(|p| groups.get(p));
    let (Some(previous), Some(group)) = (previous, groups.get(first)) else {
        return 0;
    };
    movable_starts
        .iter()
        .copied()
        .filter(|&offset| offset >= previous.span.end && offset < group.span.start)
        .min()
        .unwrap_or(group.span.start)
}

/// Turns page starts into byte cut points in the original text.
pub(crate) fn cut_points(
    groups: &[PlacedGroup],
    page_starts: &[usize],
    movable_starts: &[usize],
) -> Vec<usize> {
    page_starts
        .iter()
        .map(|&first| cut_point(groups, first, movable_starts))
        .collect()
}
