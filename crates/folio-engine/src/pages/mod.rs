//! # Page Segmentation
//!
//! Splits a long manuscript into pages of roughly `target_page_size_chars`,
//! never exceeding `max_page_size_chars` except for atomic regions (poems,
//! multi-line quotations, speech introductions), which may stretch a page to
//! [`DEFERRAL_FACTOR`] times the max.
//!
//! ## Pipeline
//!
//! ```text
//! prepare → annotate → group_regions → pre_split → accumulate → slice → rewrap
//! ```
//!
//! Pages are slices of the original text, so every byte between the first and
//! the last sentence lands on exactly one page. Headings and pass-through
//! items between two pages open the later one and count towards its size.
//! An emphasis span cut by a forced split is closed and reopened around the
//! cut.

mod accumulate;
mod region;

pub use accumulate::DEFERRAL_FACTOR;
pub use region::{SentenceGroup, group_regions, is_verse_shaped};

use crate::{
    annotate::annotate,
    config::SegmentationConfig,
    language::LanguageConfig,
    navigation::strip_navigation_backlink,
    pipeline::{DecorationHandling, LocatedDecoration, prepare},
    text::Span,
};

use accumulate::{Budget, accumulate, cut_points, pre_split};

/// The name a document is stored under, split around the page number.
///
/// `Roman.de.md` has the core name `Roman` and the suffix `.de`; its pages are
/// stored as `Roman (1).de.md`, `Roman (2).de.md` and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceName {
    pub core_name: String,
    pub suffix: String,
}

impl SourceName {
    pub fn new(core_name: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            core_name: core_name.into(),
            suffix: suffix.into(),
        }
    }

    /// File stem of the page at `page_index`: `<core> (<n>)<suffix>`, with
    /// `n` counting from one.
    pub fn page_stem(&self, page_index: usize) -> String {
        format!("{} ({}){}", self.core_name, page_index + 1, self.suffix)
    }

    /// File stem of the source document itself.
    pub fn stem(&self) -> String {
        format!("{}{}", self.core_name, self.suffix)
    }

    /// Derives the name from a file name, dropping a `.md` extension.
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
        match stem.split_once('.') {
            Some((core, rest)) if !core.is_empty() => Self::new(core, format!(".{rest}")),
            _ => Self::new(stem, ""),
        }
    }
}

/// One page of a segmented document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSegment {
    pub content: String,
    /// 0-based, contiguous.
    pub page_index: usize,
    pub char_count: usize,
}

impl PageSegment {
    fn new(content: String, page_index: usize) -> Self {
        Self {
            char_count: content.chars().count(),
            content,
            page_index,
        }
    }
}

/// Result of [`segment_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    pub pages: Vec<PageSegment>,
    pub source_core_name: String,
    pub source_suffix: String,
    /// The content was below the minimum size and returned as one page.
    pub too_short_to_split: bool,
}

impl SegmentationResult {
    /// True when splitting produced more than one page.
    pub fn is_splittable(&self) -> bool {
        self.pages.len() > 1
    }
}

/// Splits `content` into pages. A leading navigation backlink is dropped
/// first. Content below `min_content_size_chars` comes back as one page.
pub fn segment_content(
    content: &str,
    source: &SourceName,
    config: &SegmentationConfig,
    language: &LanguageConfig,
) -> SegmentationResult {
    let body = strip_navigation_backlink(content);
    let result = |pages, too_short_to_split| SegmentationResult {
        pages,
        source_core_name: source.core_name.clone(),
        source_suffix: source.suffix.clone(),
        too_short_to_split,
    };

    if body.chars().count() < config.min_content_size_chars {
        log::debug!("content below the minimum of {} chars", config.min_content_size_chars);
        return result(vec![PageSegment::new(body.to_string(), 0)], true);
    }

    let prepared = prepare(body, language, DecorationHandling::Locate);
    let groups = group_regions(annotate(&prepared, language), language);
    let budget = Budget::from_config(config);
    let placed = pre_split(&groups, &prepared.original, budget);

    let movable: Vec<usize> = prepared
        .headings
        .iter()
        .map(|h| h.start_offset)
        .chain(prepared.pass_throughs.iter().map(|p| p.original.start))
        .collect();
    let page_starts = accumulate(&placed, &prepared.original, budget, &movable);
    let mut cuts = cut_points(&placed, &page_starts, &movable);
    if cuts.is_empty() {
        cuts.push(0);
    }
    cuts.push(prepared.original.len());

    let pages: Vec<PageSegment> = cuts
        .windows(2)
        .filter_map(|w| {
            let page = Span::new(w[0], w[1]);
            let text = page
                .slice(&prepared.original)
                .trim_end()
                .trim_start_matches(['\n', '\r']);
            (!text.trim().is_empty()).then(|| rewrap(text, page, &prepared.decorations))
        })
        .enumerate()
        .map(|(index, content)| PageSegment::new(content, index))
        .collect();

    log::debug!(
        "{} groups in {} pages for {}{}",
        placed.len(),
        pages.len(),
        source.core_name,
        source.suffix
    );
    result(pages, false)
}

/// Re-balances decoration spans a page boundary cuts through: the page
/// reopens spans open at its start and closes spans still open at its end.
fn rewrap(text: &str, page: Span, decorations: &[LocatedDecoration]) -> String {
    let straddles =
        |offset: usize, d: &LocatedDecoration| d.span.start < offset && offset < d.span.end;
    let open: String = decorations
        .iter()
        .filter(|d| straddles(page.start, d))
        .map(|d| d.decoration.marker())
        .collect();
    let close: String = decorations
        .iter()
        .rev()
        .filter(|d| straddles(page.end, d))
        .map(|d| d.decoration.marker())
        .collect();
    if open.is_empty() && close.is_empty() {
        return text.to_string();
    }
    log::trace!("re-balancing decorations cut at {page:?}");
    format!("{open}{text}{close}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn small_config() -> SegmentationConfig {
        SegmentationConfig {
            target_page_size_chars: 60,
            max_page_size_chars: 100,
            min_content_size_chars: 10,
            ..SegmentationConfig::default()
        }
    }

    fn pages(text: &str, config: &SegmentationConfig) -> Vec<String> {
        segment_content(
            text,
            &SourceName::new("Buch", ""),
            config,
            &LanguageConfig::german(),
        )
        .pages
        .into_iter()
        .map(|p| p.content)
        .collect()
    }

    #[rstest]
    #[case("Roman.md", "Roman", "")]
    #[case("Roman.de.md", "Roman", ".de")]
    #[case("Notizen", "Notizen", "")]
    #[case(".versteckt.md", ".versteckt", "")]
    fn source_names(#[case] file: &str, #[case] core: &str, #[case] suffix: &str) {
        assert_eq!(SourceName::from_file_name(file), SourceName::new(core, suffix));
    }

    #[test]
    fn page_stems_count_from_one() {
        let source = SourceName::new("Roman", ".de");
        assert_eq!(source.page_stem(0), "Roman (1).de");
        assert_eq!(source.stem(), "Roman.de");
    }

    #[test]
    fn short_content_is_one_page() {
        let result = segment_content(
            "Ein kurzer Text.",
            &SourceName::new("Notiz", ""),
            &SegmentationConfig::default(),
            &LanguageConfig::german(),
        );
        assert!(result.too_short_to_split);
        assert!(!result.is_splittable());
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].content, "Ein kurzer Text.");
        assert_eq!(result.source_core_name, "Notiz");
    }

    #[test]
    fn long_content_is_split_at_sentence_boundaries() {
        let text = "Der erste Satz erzählt vom Anfang der Reise. Der zweite Satz beschreibt den Weg. Der dritte Satz erreicht das Ziel. Der vierte Satz kehrt heim.";
        let result = pages(text, &small_config());
        assert!(result.len() > 1);
        assert!(result.iter().all(|p| p.ends_with('.')));
        assert_eq!(result.join(" "), text);
    }

    #[test]
    fn headings_open_the_next_page() {
        let text = "Der erste Satz erzählt vom Anfang der Reise und ist lang genug.\n\n## Zweites Kapitel\n\nDer zweite Satz beschreibt den Weg und ist ebenfalls lang.";
        let result = pages(text, &small_config());
        assert_eq!(result.len(), 2);
        assert_snapshot!(result[1].lines().next().unwrap_or_default(), @"## Zweites Kapitel");
    }

    #[test]
    fn navigation_backlink_is_dropped() {
        let text = "[[Buch|↑ Buch]]\nDer erste Satz erzählt vom Anfang der Reise und ist lang genug.";
        let result = pages(text, &small_config());
        assert_eq!(result.len(), 1);
        assert!(!result[0].contains("↑"));
    }

    #[test]
    fn pages_are_reindexed_from_zero() {
        let text = "Der erste Satz erzählt vom Anfang der Reise. Der zweite Satz beschreibt den Weg. Der dritte Satz erreicht das Ziel.";
        let result = segment_content(
            text,
            &SourceName::new("Buch", ".de"),
            &small_config(),
            &LanguageConfig::german(),
        );
        let indices: Vec<usize> = result.pages.iter().map(|p| p.page_index).collect();
        assert_eq!(indices, (0..result.pages.len()).collect::<Vec<_>>());
        assert_eq!(result.source_suffix, ".de");
    }

    #[test]
    fn poem_is_never_split() {
        let poem = "Über allen Gipfeln\nIst Ruh,\nIn allen Wipfeln\nSpürest du\nKaum einen Hauch;";
        let text = format!("Ein einleitender Satz, der vor dem Gedicht steht und es ankündigt.\n\n{poem}");
        let result = pages(&text, &small_config());
        assert!(result.iter().any(|p| p.contains(poem)));
    }

    #[test]
    fn headings_count_towards_the_page_they_open() {
        let headings = "# Erster Teil: Die lange Reise nach Norden\n## Kapitel eins, in dem alles beginnt\n### Der erste Morgen\n\n";
        let sentences: Vec<String> = (1..=6)
            .map(|i| format!("Der Satz Nummer {i} steht hier auf dieser Seite."))
            .collect();
        let text = format!("{headings}{}", sentences.join(" "));
        let config = SegmentationConfig {
            target_page_size_chars: 100,
            max_page_size_chars: 120,
            min_content_size_chars: 10,
            ..SegmentationConfig::default()
        };

        let result = segment_content(
            &text,
            &SourceName::new("Buch", ""),
            &config,
            &LanguageConfig::german(),
        );

        assert!(result.pages.len() > 1);
        assert!(result.pages[0].content.starts_with("# Erster Teil"));
        for page in &result.pages {
            assert!(
                page.char_count <= 180,
                "page {} has {} chars",
                page.page_index,
                page.char_count
            );
        }
    }

    #[test]
    fn forced_split_keeps_emphasis_balanced() {
        let sentences: Vec<String> = (1..=10)
            .map(|i| format!("Der betonte Satz Nummer {i} ist hier."))
            .collect();
        let text = format!("**{}**", sentences.join(" "));
        let config = SegmentationConfig {
            target_page_size_chars: 100,
            max_page_size_chars: 150,
            min_content_size_chars: 10,
            ..SegmentationConfig::default()
        };

        let result = pages(&text, &config);

        assert!(result.len() > 1);
        for page in &result {
            assert!(page.starts_with("**") && page.ends_with("**"), "unbalanced page {page:?}");
            assert_eq!(page.matches("**").count(), 2);
        }
        let unwrapped: Vec<&str> = result
            .iter()
            .map(|p| p.trim_start_matches("**").trim_end_matches("**"))
            .collect();
        assert_eq!(unwrapped.join(" "), sentences.join(" "));
    }

    #[test]
    fn rewrap_balances_only_cut_spans() {
        use crate::decoration::Decoration;

        let text = "**Eins. Zwei.** Drei.";
        let decorations = [LocatedDecoration {
            decoration: Decoration::Strong,
            span: Span::new(0, 15),
        }];
        assert_eq!(rewrap(text, Span::new(0, text.len()), &decorations), text);
        assert_eq!(rewrap("**Eins.", Span::new(0, 7), &decorations), "**Eins.**");
        assert_eq!(rewrap("Zwei.**", Span::new(8, 15), &decorations), "**Zwei.**");
    }
}
