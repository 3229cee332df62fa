use serde::{Deserialize, Serialize};

use crate::language::LanguageConfig;

/// Character budgets for page segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Soft target: a page is cut once it reaches this many chars.
    pub target_page_size_chars: usize,
    /// Hard limit for pages built from splittable groups.
    pub max_page_size_chars: usize,
    /// Documents shorter than this are not split at all.
    pub min_content_size_chars: usize,
    /// Legacy flag of the retired rule-based splitter; accepted and ignored.
    pub preserve_dialogues: bool,
    /// Legacy flag of the retired rule-based splitter; accepted and ignored.
    pub preserve_paragraphs: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            target_page_size_chars: 3000,
            max_page_size_chars: 6000,
            min_content_size_chars: 1500,
            preserve_dialogues: true,
            preserve_paragraphs: true,
        }
    }
}

impl SegmentationConfig {
    /// Target clamped so it never exceeds the hard limit.
    pub fn effective_target(&self) -> usize {
        self.target_page_size_chars.min(self.max_page_size_chars).max(1)
    }

    pub fn effective_max(&self) -> usize {
        self.max_page_size_chars.max(1)
    }
}

/// Word budgets for block reference marking.
#[derive(Debug, Clone)]
pub struct BlockMarkerConfig {
    /// Sentences with at most this many words are merged with a neighbour.
    pub short_sentence_words: usize,
    /// Merging never produces a block with more words than this.
    pub max_merged_words: usize,
    pub language: LanguageConfig,
}

impl Default for BlockMarkerConfig {
    fn default() -> Self {
        Self {
            short_sentence_words: 4,
            max_merged_words: 30,
            language: LanguageConfig::default(),
        }
    }
}
