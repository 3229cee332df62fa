use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::{
    annotate::annotate,
    blocks::{group_blocks, split_str_in_blocks, word_count},
    config::{BlockMarkerConfig, SegmentationConfig},
    language::LanguageConfig,
    pages::{DEFERRAL_FACTOR, SourceName, segment_content},
    pipeline::{DecorationHandling, prepare},
    protect::protect,
    scan::scan_lines,
};

/// Create a temporary directory for file tests
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

const PROSE: &[&str] = &[
    "Der Morgen begann mit einem leisen Regen über den Dächern der Stadt.",
    "Anna stand am Fenster und sah den Tropfen zu.",
    "Sie lachte.",
    "In der Küche kochte das Wasser für den Tee, und irgendwo schlug eine Tür.",
    "Ihr Bruder schlief noch, wie jeden Sonntag, bis weit in den Vormittag hinein.",
    "Das war gut so.",
    "Später würden sie gemeinsam zum Markt gehen und frisches Brot kaufen.",
];

const POEM: &str = "Über allen Gipfeln\nIst Ruh,\nIn allen Wipfeln\nSpürest du\nKaum einen Hauch;";

const QUOTE: &str = "„Wir gehen heute in die Stadt hinein.\nDort kaufen wir Brot und Käse.\nDann kommen wir wieder heim.“";

/// A deterministic manuscript of prose paragraphs with an occasional poem,
/// multi-line quotation and emphasis span.
pub fn manuscript(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|p| match p % 7 {
            3 => POEM.to_string(),
            5 => QUOTE.to_string(),
            _ => {
                let sentences: Vec<&str> = (0..5).map(|s| PROSE[(p + s) % PROSE.len()]).collect();
                if p % 4 == 1 {
                    format!("*{}*", sentences.join(" "))
                } else {
                    sentences.join(" ")
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn page_config() -> SegmentationConfig {
    SegmentationConfig {
        target_page_size_chars: 400,
        max_page_size_chars: 600,
        min_content_size_chars: 200,
        ..SegmentationConfig::default()
    }
}

fn marker_ids(marked: &str) -> Vec<usize> {
    marked
        .split(" ^")
        .skip(1)
        .filter_map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .collect()
}

#[test]
fn pages_cover_every_non_whitespace_char() {
    let text = manuscript(30);
    let result = segment_content(
        &text,
        &SourceName::new("Roman", ""),
        &page_config(),
        &LanguageConfig::german(),
    );

    assert!(result.pages.len() > 1);
    let joined: String = result.pages.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(non_whitespace(&joined), non_whitespace(&text));
}

#[test]
fn pages_stay_within_the_stretched_max() {
    let config = page_config();
    let text = manuscript(40);
    let result = segment_content(
        &text,
        &SourceName::new("Roman", ""),
        &config,
        &LanguageConfig::german(),
    );

    let stretched = (config.max_page_size_chars as f64 * DEFERRAL_FACTOR) as usize;
    for page in &result.pages {
        assert!(
            page.char_count <= stretched,
            "page {} has {} chars",
            page.page_index,
            page.char_count
        );
    }
}

#[test]
fn poems_and_quotes_are_never_split_across_pages() {
    let text = manuscript(30);
    let result = segment_content(
        &text,
        &SourceName::new("Roman", ""),
        &page_config(),
        &LanguageConfig::german(),
    );

    let poems: usize = result.pages.iter().map(|p| p.content.matches(POEM).count()).sum();
    let quotes: usize = result.pages.iter().map(|p| p.content.matches(QUOTE).count()).sum();
    assert_eq!(poems, text.matches(POEM).count());
    assert_eq!(quotes, text.matches(QUOTE).count());
}

#[test]
fn merged_blocks_respect_the_word_budget() {
    let config = BlockMarkerConfig::default();
    let text = manuscript(20);
    let prepared = prepare(&text, &config.language, DecorationHandling::Strip);
    let blocks = group_blocks(annotate(&prepared, &config.language), &config);

    assert!(!blocks.is_empty());
    for block in blocks.iter().filter(|b| b.sentences.len() > 1) {
        assert!(block.word_count <= config.max_merged_words);
        let counted: usize = block.sentences.iter().map(|s| word_count(s.text())).sum();
        assert_eq!(counted, block.word_count);
    }
}

#[test]
fn block_ids_are_contiguous_from_the_start_index() {
    let split = split_str_in_blocks(&manuscript(14), 42, &BlockMarkerConfig::default());

    let ids = marker_ids(&split.marked_text);
    assert_eq!(ids.len(), split.block_count);
    assert_eq!(ids, (42..42 + split.block_count).collect::<Vec<_>>());
}

#[test]
fn marking_keeps_every_word() {
    let text = manuscript(14);
    let split = split_str_in_blocks(&text, 0, &BlockMarkerConfig::default());

    let unmarked = split
        .marked_text
        .split(" ^")
        .map(|part| part.trim_start_matches(|c: char| c.is_ascii_digit()))
        .collect::<String>();
    assert_eq!(
        non_whitespace(&unmarked).replace('*', ""),
        non_whitespace(&text).replace('*', "")
    );
}

#[test]
fn protection_restores_the_input() {
    let inputs = [
        "Siehe https://example.com/a_(b) und [[Notiz|Alias]].",
        "Vorher.\n\n```\nlet x = 1.5;\n```\n\n---\n\n[Link](https://example.org). Ende.",
        "Kein Markdown hier. Nur Sätze.",
    ];
    for input in inputs {
        assert_eq!(protect(input).restore_all(), input);
    }
}

#[test]
fn quote_depth_carries_from_line_to_line() {
    let text = manuscript(14);
    let lines = scan_lines(&text, &LanguageConfig::german());

    assert_eq!(lines.first().map(|l| l.quote_depth_before), Some(0));
    for pair in lines.windows(2) {
        assert_eq!(pair[1].quote_depth_before, pair[0].quote_state_after.depth());
    }
}
