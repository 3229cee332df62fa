//! Word-budget grouping of annotated sentences into blocks.
//!
//! The grouper walks the sentences once with a three-state carry:
//!
//! - `Idle`: nothing pending
//! - `HoldingShort`: a short sentence waits for its successor to decide
//!   whether it merges forward, backward or stands alone
//! - `HoldingIntro`: the last block is a speech introduction that absorbs the
//!   next sentence
//!
//! Rules, first match wins:
//!
//! 1. a new paragraph closes the current block and resolves a held short
//!    sentence (backward if within budget, else alone)
//! 2. a standalone URL never merges
//! 3. a pending speech introduction absorbs the sentence
//! 4. a sentence inside a quote extends the current block while the budget
//!    allows
//! 5. a short sentence is held; a short colon-terminated one opens a speech
//!    introduction instead
//! 6. anything else opens a new block

use unicode_segmentation::UnicodeSegmentation;

use crate::{annotate::AnnotatedSentence, config::BlockMarkerConfig};

/// Words as counted for block budgets.
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// Sentences that receive one reference marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Never empty.
    pub sentences: Vec<AnnotatedSentence>,
    pub word_count: usize,
    pub char_count: usize,
    /// The block is a speech introduction still waiting for its speech.
    pub pending_speech_intro: bool,
}

impl Block {
    fn new(sentence: AnnotatedSentence, words: usize) -> Self {
        Self {
            word_count: words,
            char_count: sentence.token.char_count,
            sentences: vec![sentence],
            pending_speech_intro: false,
        }
    }

    fn push(&mut self, sentence: AnnotatedSentence, words: usize) {
        self.word_count += words;
        self.char_count += sentence.token.char_count;
        self.sentences.push(sentence);
    }

    pub fn first(&self) -> Option<&AnnotatedSentence> {
        self.sentences.first()
    }

    /// True if the block opens a paragraph.
    pub fn starts_paragraph(&self) -> bool {
        self.first().is_some_and(|s| s.starts_new_paragraph)
    }
}

#[derive(Debug)]
enum Carry {
    Idle,
    HoldingShort {
        sentence: AnnotatedSentence,
        words: usize,
    },
    HoldingIntro,
}

struct Grouper<'a> {
    config: &'a BlockMarkerConfig,
    blocks: Vec<Block>,
    carry: Carry,
    /// The last block belongs to the current paragraph and may grow.
    open: bool,
}

impl<'a> Grouper<'a> {
    fn new(config: &'a BlockMarkerConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            carry: Carry::Idle,
            open: false,
        }
    }

    fn fits(&self, words: usize) -> bool {
        self.open
            && self
                .blocks
                .last()
                .is_some_and(|b| b.word_count + words <= self.config.max_merged_words)
    }

    fn open_block(&mut self, sentence: AnnotatedSentence, words: usize) {
        self.blocks.push(Block::new(sentence, words));
        self.open = true;
    }

    fn extend(&mut self, sentence: AnnotatedSentence, words: usize) {
        match self.blocks.last_mut() {
            Some(block) => block.push(sentence, words),
            None => self.open_block(sentence, words),
        }
    }

    /// Places a held short sentence without a successor to merge into:
    /// backward if within budget, else alone.
    fn settle_backward(&mut self) {
        if let Carry::HoldingShort { sentence, words } =
            std::mem::replace(&mut self.carry, Carry::Idle)
        {
            if self.fits(words) {
                log::trace!("short sentence merges backward");
                self.extend(sentence, words);
            } else {
                self.open_block(sentence, words);
            }
        }
        self.carry = Carry::Idle;
    }

    fn push(&mut self, sentence: AnnotatedSentence) {
        let words = word_count(sentence.text());

        // 1
        if sentence.starts_new_paragraph {
            self.settle_backward();
            self.open = false;
        }

        // 2
        if sentence.is_standalone_url {
            self.settle_backward();
            self.blocks.push(Block::new(sentence, words));
            self.open = false;
            return;
        }

        match std::mem::replace(&mut self.carry, Carry::Idle) {
            // 3
            Carry::HoldingIntro => {
                if let Some(block) = self.blocks.last_mut() {
                    block.pending_speech_intro = false;
                }
                self.extend(sentence, words);
                return;
            }
            Carry::HoldingShort {
                sentence: held,
                words: held_words,
            } => {
                if held_words + words <= self.config.max_merged_words {
                    log::trace!("short sentence merges forward");
                    self.open_block(held, held_words);
                    self.extend(sentence, words);
                    return;
                }
                self.carry = Carry::HoldingShort {
                    sentence: held,
                    words: held_words,
                };
                self.settle_backward();
            }
            Carry::Idle => {}
        }

        // 4
        if sentence.quote_depth > 0 && self.fits(words) {
            self.extend(sentence, words);
            return;
        }

        // 5
        if words <= self.config.short_sentence_words {
            if sentence.text().trim_end().ends_with(':') {
                self.open_block(sentence, words);
                if let Some(block) = self.blocks.last_mut() {
                    block.pending_speech_intro = true;
                }
                self.carry = Carry::HoldingIntro;
            } else {
                self.carry = Carry::HoldingShort { sentence, words };
            }
            return;
        }

        // 6
        self.open_block(sentence, words);
    }

    fn finish(mut self) -> Vec<Block> {
        self.settle_backward();
        self.blocks
    }
}

/// Groups sentences into blocks.
pub fn group_blocks(sentences: Vec<AnnotatedSentence>, config: &BlockMarkerConfig) -> Vec<Block> {
    let mut grouper = Grouper::new(config);
    for sentence in sentences {
        grouper.push(sentence);
    }
    let blocks = grouper.finish();
    log::debug!("grouped into {} blocks", blocks.len());
    blocks
}
