//! Serialization of blocks with their reference markers, headings and
//! pass-through items put back in document order.

use crate::{decoration::join_restored, extract::ExtractedHeading, pipeline::PassThrough};

use super::grouper::Block;

/// Separator between items of one paragraph.
const ITEM_SEPARATOR: &str = "\n\n";

/// Separator before a block opening a new paragraph after another block.
const PARAGRAPH_SEPARATOR: &str = "\n\n\n\n";

/// Renders the sentences of a block, joined by their original whitespace.
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    let mut previous = None;
    for (i, sentence) in block.sentences.iter().enumerate() {
        if i == 0 {
            out.push_str(sentence.text());
        } else {
            let gap = match sentence.gap_before.as_str() {
                "" => " ",
                gap => gap,
            };
            join_restored(&mut out, previous, gap, sentence.text(), sentence.wrapped_in);
        }
        previous = sentence.wrapped_in;
    }
    out
}

enum Item<'a> {
    Heading(&'a ExtractedHeading),
    PassThrough(&'a PassThrough),
    Block(&'a Block),
}

/// Joins blocks, headings and pass-through items by original offset and
/// appends ` ^N` to every block, `N` counting up from `start_index`.
pub fn format_blocks(
    blocks: &[Block],
    headings: &[ExtractedHeading],
    pass_throughs: &[PassThrough],
    start_index: usize,
) -> String {
    let mut items: Vec<(usize, Item<'_>)> = headings
        .iter()
        .map(|h| (h.start_offset, Item::Heading(h)))
        .chain(pass_throughs.iter().map(|p| (p.original.start, Item::PassThrough(p))))
        .chain(
            blocks
                .iter()
                .filter_map(|b| Some((b.first()?.original.start, Item::Block(b)))),
        )
        .collect();
    items.sort_by_key(|(offset, _)| *offset);

    let mut out = String::new();
    let mut next_id = start_index;
    let mut previous_was_block = false;
    for (_, item) in items {
        let (text, is_block, opens_paragraph) = match item {
            Item::Heading(heading) => (heading.text.trim_end().to_string(), false, false),
            Item::PassThrough(pass_through) => (pass_through.text.clone(), false, false),
            Item::Block(block) => {
                let rendered = format!("{} ^{next_id}", render_block(block));
                next_id += 1;
                (rendered, true, block.starts_paragraph())
            }
        };
        if !out.is_empty() {
            out.push_str(if previous_was_block && is_block && opens_paragraph {
                PARAGRAPH_SEPARATOR
            } else {
                ITEM_SEPARATOR
            });
        }
        out.push_str(&text);
        previous_was_block = is_block;
    }
    out
}
