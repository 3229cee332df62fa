//! # Block Reference Markers
//!
//! Tags text with sentence-aligned ` ^N` markers. Blocks are bounded by a
//! word budget rather than a char budget and never cross a paragraph.
//!
//! ```text
//! heal → prepare (strip decorations) → annotate → group_blocks → format
//! ```
//!
//! Headings, horizontal rules and fenced code blocks are emitted verbatim
//! without a marker.

mod format;
mod grouper;

pub use format::{format_blocks, render_block};
pub use grouper::{Block, group_blocks, word_count};

use crate::{
    annotate::annotate,
    config::BlockMarkerConfig,
    pipeline::{DecorationHandling, prepare},
};

/// Result of [`split_str_in_blocks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSplit {
    pub marked_text: String,
    pub block_count: usize,
}

/// Marks every block of `text` with ` ^N`, numbering from `start_index`.
/// Empty or whitespace-only text yields an empty result.
pub fn split_str_in_blocks(text: &str, start_index: usize, config: &BlockMarkerConfig) -> BlockSplit {
    if text.trim().is_empty() {
        return BlockSplit::default();
    }

    let prepared = prepare(text, &config.language, DecorationHandling::Strip);
    let blocks = group_blocks(annotate(&prepared, &config.language), config);
    let marked_text = format_blocks(
        &blocks,
        &prepared.headings,
        &prepared.pass_throughs,
        start_index,
    );

    log::debug!(
        "marked {} blocks starting at ^{start_index}",
        blocks.len()
    );
    BlockSplit {
        marked_text,
        block_count: blocks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn marked(text: &str) -> BlockSplit {
        split_str_in_blocks(text, 0, &BlockMarkerConfig::default())
    }

    #[test]
    fn single_sentence() {
        let split = marked("Dies ist ein einfacher Satz.");
        assert_eq!(split.marked_text, "Dies ist ein einfacher Satz. ^0");
        assert_eq!(split.block_count, 1);
    }

    #[test]
    fn short_lead_is_one_block() {
        let split = marked("Das ist gut. Das Mädchen ging jeden Tag hinaus.");
        assert_eq!(split.block_count, 1);
        assert_snapshot!(split.marked_text, @"Das ist gut. Das Mädchen ging jeden Tag hinaus. ^0");
    }

    #[rstest]
    #[case("")]
    #[case("   \n\n\t ")]
    fn blank_input_is_empty(#[case] text: &str) {
        assert_eq!(marked(text), BlockSplit::default());
    }

    #[test]
    fn rule_is_kept_without_marker() {
        let split = marked("Before.\n\n---\n\nAfter.");
        assert_eq!(split.block_count, 2);
        assert_eq!(split.marked_text, "Before. ^0\n\n---\n\nAfter. ^1");
    }

    #[test]
    fn numbering_continues_from_start_index() {
        let split = split_str_in_blocks(
            "Das Mädchen ging jeden Tag hinaus. Der Junge blieb immer im Haus.",
            7,
            &BlockMarkerConfig::default(),
        );
        assert_eq!(
            split.marked_text,
            "Das Mädchen ging jeden Tag hinaus. ^7\n\nDer Junge blieb immer im Haus. ^8"
        );
    }

    #[test]
    fn paragraphs_are_separated_by_three_blank_lines() {
        let split = marked("Das Mädchen ging jeden Tag hinaus.\n\nDer Junge blieb immer im Haus.");
        assert_eq!(
            split.marked_text,
            "Das Mädchen ging jeden Tag hinaus. ^0\n\n\n\nDer Junge blieb immer im Haus. ^1"
        );
    }

    #[test]
    fn headings_are_reinserted_without_marker() {
        let split = marked("# Kapitel eins\n\nDas Mädchen ging jeden Tag hinaus.");
        assert_eq!(
            split.marked_text,
            "# Kapitel eins\n\nDas Mädchen ging jeden Tag hinaus. ^0"
        );
        assert_eq!(split.block_count, 1);
    }

    #[test]
    fn straddling_emphasis_stays_balanced() {
        let split = marked("*First sentence here. Second sentence here.*");
        assert_eq!(split.block_count, 1);
        assert_snapshot!(split.marked_text, @"*First sentence here. Second sentence here.* ^0");
    }

    #[test]
    fn emphasis_split_across_blocks_is_closed_in_each() {
        let split = marked("**Das Mädchen ging jeden Tag hinaus. Der Junge blieb immer im Haus.**");
        assert_eq!(
            split.marked_text,
            "**Das Mädchen ging jeden Tag hinaus.** ^0\n\n**Der Junge blieb immer im Haus.** ^1"
        );
    }

    #[test]
    fn code_fence_is_kept_verbatim() {
        let split = marked("Das Mädchen ging jeden Tag hinaus.\n\n```\nfn main() {}\n```");
        assert_eq!(
            split.marked_text,
            "Das Mädchen ging jeden Tag hinaus. ^0\n\n```\nfn main() {}\n```"
        );
    }

    #[test]
    fn verse_keeps_its_line_breaks() {
        let split = marked("Über allen Gipfeln\nIst Ruh,\nIn allen Wipfeln\nSpürest du");
        assert_eq!(split.block_count, 2);
        assert_eq!(
            split.marked_text,
            "Über allen Gipfeln\nIst Ruh, ^0\n\nIn allen Wipfeln\nSpürest du ^1"
        );
    }
}
