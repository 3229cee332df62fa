//! Navigation line of page files.
//!
//! Every page file opens with one line linking back to the source document
//! and to its neighbours:
//!
//! ```text
//! [[Roman.de|↑ Roman]] · [[Roman (1).de|← 1]] · [[Roman (3).de|3 →]]
//! ```
//!
//! Only the backlink is required; it is what [`strip_navigation_backlink`]
//! looks for before a page is segmented again.

use std::sync::LazyLock;

use regex::Regex;

use crate::pages::{PageSegment, SourceName};

/// Marks the alias of a backlink.
pub const BACKLINK_ARROW: &str = "↑";

static BACKLINK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\[\[[^\[\]|\n]+\|↑ [^\[\]\n]*\]\][^\n]*(?:\n|\z)")
        .expect("Invalid backlink regex")
});

/// `[[<core><suffix>|↑ <core>]]`
pub fn backlink(source: &SourceName) -> String {
    format!("[[{}|{BACKLINK_ARROW} {}]]", source.stem(), source.core_name)
}

/// Drops a leading navigation line and the blank lines after it.
pub fn strip_navigation_backlink(content: &str) -> &str {
    match BACKLINK_LINE.find(content) {
        Some(line) => content[line.end()..].trim_start_matches(['\n', '\r']),
        None => content,
    }
}

/// Renders a page file: navigation line, blank line, page content.
pub fn render_page_file(source: &SourceName, page: &PageSegment, page_count: usize) -> String {
    let mut links = vec![backlink(source)];
    if let Some(previous) = page.page_index.checked_sub(1) {
        links.push(format!(
            "[[{}|← {}]]",
            source.page_stem(previous),
            previous + 1
        ));
    }
    let next = page.page_index + 1;
    if next < page_count {
        links.push(format!("[[{}|{} →]]", source.page_stem(next), next + 1));
    }
    format!("{}\n\n{}\n", links.join(" · "), page.content)
}
