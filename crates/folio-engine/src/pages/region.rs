//! Region grouping: merges sentences that must stay on one page into atomic
//! [`SentenceGroup`]s.

use crate::{
    annotate::{AnnotatedSentence, Region},
    language::LanguageConfig,
};

/// An exclamation inside a quote shorter than this reads as a verse line.
const SHORT_EXCLAMATION_CHARS: usize = 50;

/// Atomic placement unit for pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceGroup {
    /// Never empty.
    pub sentences: Vec<AnnotatedSentence>,
    /// Chars of the sentences plus the whitespace between them.
    pub char_count: usize,
    pub is_splittable: bool,
}

impl SentenceGroup {
    fn start(first: AnnotatedSentence) -> Self {
        Self {
            char_count: first.token.char_count,
            sentences: vec![first],
            is_splittable: true,
        }
    }

    fn push(&mut self, sentence: AnnotatedSentence) {
        self.char_count += sentence.gap_before.chars().count() + sentence.token.char_count;
        self.sentences.push(sentence);
    }

    pub fn last(&self) -> Option<&AnnotatedSentence> {
        self.sentences.last()
    }
}

/// Why two consecutive sentences stay together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bond {
    Poem,
    VerseShape,
    HardBreak,
    MultilineQuote,
    SpeechIntro,
    Decoration,
}

impl Bond {
    /// Region bonds survive a paragraph break.
    fn crosses_paragraphs(self) -> bool {
        !matches!(self, Bond::VerseShape | Bond::HardBreak)
    }
}

/// Short and without terminal prose punctuation, or a short exclamation
/// inside a quote.
pub fn is_verse_shaped(sentence: &AnnotatedSentence, language: &LanguageConfig) -> bool {
    let chars = sentence.token.char_count;
    let short_fragment = chars < language.poem_max_line_chars && !sentence.token.is_complete;
    let quoted_exclamation = sentence.quote_depth > 0
        && chars < SHORT_EXCLAMATION_CHARS
        && sentence
            .text()
            .trim_end_matches(|c: char| language.is_quote(c) || "*_~=".contains(c))
            .ends_with('!');
    short_fragment || quoted_exclamation
}

fn bond(
    running: &AnnotatedSentence,
    next: &AnnotatedSentence,
    language: &LanguageConfig,
) -> Option<Bond> {
    if running.is_poem && next.is_poem {
        Some(Bond::Poem)
    } else if running.region == Region::MultilineQuote && next.region == Region::MultilineQuote {
        Some(Bond::MultilineQuote)
    } else if running.region == Region::SpeechIntro {
        Some(Bond::SpeechIntro)
    } else if running.decoration.is_some() && running.decoration == next.decoration {
        Some(Bond::Decoration)
    } else if is_verse_shaped(running, language) && is_verse_shaped(next, language) {
        Some(Bond::VerseShape)
    } else if running.ends_with_hard_break {
        Some(Bond::HardBreak)
    } else {
        None
    }
}

/// Groups annotated sentences greedily. A new paragraph splits the running
/// group unless a region bond holds.
pub fn group_regions(
    sentences: Vec<AnnotatedSentence>,
    language: &LanguageConfig,
) -> Vec<SentenceGroup> {
    let mut groups: Vec<SentenceGroup> = Vec::new();

    for sentence in sentences {
        let joined = groups.last().and_then(|g| g.last()).and_then(|running| {
            bond(running, &sentence, language)
                .filter(|b| !sentence.starts_new_paragraph || b.crosses_paragraphs())
        });
        match (joined, groups.last_mut()) {
            (Some(b), Some(group)) => {
                log::trace!("keeping sentence with its group: {b:?}");
                group.push(sentence);
            }
            _ => groups.push(SentenceGroup::start(sentence)),
        }
    }

    for group in &mut groups {
        group.is_splittable = splittable(group, language);
    }
    log::debug!(
        "{} sentence groups, {} atomic",
        groups.len(),
        groups.iter().filter(|g| !g.is_splittable).count()
    );
    groups
}

fn splittable(group: &SentenceGroup, language: &LanguageConfig) -> bool {
    let any_verse = group
        .sentences
        .iter()
        .any(|s| s.is_poem || is_verse_shaped(s, language));
    let all_quote = group
        .sentences
        .iter()
        .all(|s| s.region == Region::MultilineQuote);
    let any_intro = group
        .sentences
        .iter()
        .any(|s| s.region == Region::SpeechIntro);
    let shares_decoration = group
        .sentences
        .windows(2)
        .any(|pair| pair[0].decoration.is_some() && pair[0].decoration == pair[1].decoration);
    !(any_verse || all_quote || any_intro || shares_decoration)
}
