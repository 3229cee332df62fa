//! # Shared Preparation
//!
//! Both output paths run the same front half:
//!
//! ```text
//! [heal] → scan → extract headings → protect → [strip decorations] → segment
//! ```
//!
//! Healing and stripping run only for block marking, where every sentence is
//! re-emitted on its own and has to be balanced. Pages are sliced out of the
//! original text, so there the decoration spans are only located.
//!
//! Sentences that are a single horizontal rule or fenced code block are taken
//! out of the sentence stream as pass-through items.

use crate::{
    decoration::{self, Decoration, RestoredSentence, Stripped},
    extract::{ExtractedHeading, extract_headings},
    kinds::HorizontalRule,
    language::LanguageConfig,
    protect::{ProtectionKind, protect},
    scan::{ScannedLine, scan_lines},
    sentence::{SentenceToken, sentence_spans},
    text::{OffsetChain, Span},
};

/// What to do with emphasis spans straddling sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationHandling {
    /// Locate them only.
    Locate,
    /// Heal unclosed markers, strip the spans and re-wrap every sentence.
    Strip,
}

/// Content emitted verbatim, never numbered or counted as a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughKind {
    HorizontalRule,
    CodeFence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassThrough {
    pub kind: PassThroughKind,
    /// Verbatim text.
    pub text: String,
    /// Span in the original text.
    pub original: Span,
}

/// A sentence with everything later stages need to know about its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSentence {
    pub token: SentenceToken,
    /// Span in the original text.
    pub original: Span,
    /// Segmented text between the previous item and this sentence.
    pub gap_before: String,
    /// A pass-through item sits between the previous sentence and this one.
    pub follows_pass_through: bool,
    /// Index of the multi-sentence decoration span this sentence overlaps.
    pub decoration: Option<usize>,
    /// Restoration wrapped the whole sentence in this decoration.
    pub wrapped_in: Option<Decoration>,
    /// The sentence is nothing but a URL or link.
    pub is_standalone_url: bool,
}

/// A decoration span located in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedDecoration {
    pub decoration: Decoration,
    /// Span of the markers and their content in the original text.
    pub span: Span,
}

/// Output of [`prepare`].
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Text every `original` span refers to (healed when stripping).
    pub original: String,
    pub lines: Vec<ScannedLine>,
    pub headings: Vec<ExtractedHeading>,
    pub sentences: Vec<PreparedSentence>,
    pub pass_throughs: Vec<PassThrough>,
    pub decorations: Vec<LocatedDecoration>,
}

/// Runs the shared front half of both pipelines.
pub fn prepare(text: &str, language: &LanguageConfig, handling: DecorationHandling) -> Prepared {
    let original = match handling {
        DecorationHandling::Strip => decoration::heal_unclosed(text),
        DecorationHandling::Locate => text.to_string(),
    };
    let lines = scan_lines(&original, language);
    let filter = extract_headings(&original, &lines);
    let protected = protect(&filter.filtered);
    let spans = decoration::find_spans(&protected.text);

    let stripped: Option<Stripped> = match handling {
        DecorationHandling::Strip => Some(decoration::strip(&protected.text, &spans)),
        DecorationHandling::Locate => None,
    };
    let (segmented, decoration_regions): (&str, Vec<Span>) = match &stripped {
        Some(stripped) => (
            stripped.text.as_str(),
            stripped.spans.iter().map(|s| s.content).collect(),
        ),
        None => (
            protected.text.as_str(),
            spans.iter().map(|s| s.span()).collect(),
        ),
    };
    let chain = OffsetChain::new([
        stripped.as_ref().map(|s| &s.map),
        Some(&protected.map),
        Some(&filter.map),
    ]);

    let unstripped = OffsetChain::new([None, Some(&protected.map), Some(&filter.map)]);
    let decorations = spans
        .iter()
        .map(|s| LocatedDecoration {
            decoration: s.decoration,
            span: unstripped.span_to_original(s.span()),
        })
        .collect();

    let mut sentences = Vec::new();
    let mut pass_throughs = Vec::new();
    let mut previous_end = 0usize;
    let mut follows_pass_through = false;

    for span in sentence_spans(segmented, language) {
        let raw = span.slice(segmented);
        let original_span = chain.span_to_original(span);
        let sole = protected.sole_content(raw);
        let gap_before = Span::new(previous_end, span.start).slice(segmented).to_string();
        previous_end = span.end;

        let pass_through = match sole.map(|c| c.kind) {
            Some(ProtectionKind::CodeFence) => Some(PassThroughKind::CodeFence),
            Some(ProtectionKind::HorizontalRule) => Some(PassThroughKind::HorizontalRule),
            _ if HorizontalRule::is_rule(raw) => Some(PassThroughKind::HorizontalRule),
            _ => None,
        };
        if let Some(kind) = pass_through {
            log::trace!("pass-through {kind:?} at {original_span:?}");
            pass_throughs.push(PassThrough {
                kind,
                text: protected.restore(raw),
                original: original_span,
            });
            follows_pass_through = true;
            continue;
        }

        let restored = match &stripped {
            Some(stripped) => stripped.restore(span),
            None => RestoredSentence {
                text: raw.to_string(),
                wrapped_in: None,
            },
        };
        sentences.push(PreparedSentence {
            token: SentenceToken::new(protected.restore(&restored.text), span),
            original: original_span,
            gap_before,
            follows_pass_through,
            decoration: decoration_regions.iter().position(|r| r.overlaps(span)),
            wrapped_in: restored.wrapped_in,
            is_standalone_url: matches!(
                sole.map(|c| c.kind),
                Some(ProtectionKind::Url | ProtectionKind::MarkdownLink)
            ),
        });
        follows_pass_through = false;
    }

    log::debug!(
        "prepared {} sentences, {} pass-through items, {} headings",
        sentences.len(),
        pass_throughs.len(),
        filter.headings.len()
    );
    Prepared {
        original,
        lines,
        headings: filter.headings,
        sentences,
        pass_throughs,
        decorations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(prepared: &Prepared) -> Vec<&str> {
        prepared
            .sentences
            .iter()
            .map(|s| s.token.text.as_str())
            .collect()
    }

    #[test]
    fn rules_become_pass_through() {
        let prepared = prepare(
            "Before.\n\n---\n\nAfter.",
            &LanguageConfig::german(),
            DecorationHandling::Strip,
        );
        assert_eq!(texts(&prepared), vec!["Before.", "After."]);
        assert_eq!(prepared.pass_throughs.len(), 1);
        assert_eq!(prepared.pass_throughs[0].text, "---");
        assert_eq!(prepared.pass_throughs[0].original, Span::new(9, 12));
        assert!(prepared.sentences[1].follows_pass_through);
    }

    #[test]
    fn code_fences_become_pass_through() {
        let text = "Vorher.\n\n```\nlet x = a. b;\n```\n\nNachher.";
        let prepared = prepare(text, &LanguageConfig::german(), DecorationHandling::Locate);
        assert_eq!(texts(&prepared), vec!["Vorher.", "Nachher."]);
        assert_eq!(prepared.pass_throughs[0].kind, PassThroughKind::CodeFence);
        assert_eq!(prepared.pass_throughs[0].text, "```\nlet x = a. b;\n```");
        assert_eq!(
            prepared.pass_throughs[0].original.slice(text),
            "```\nlet x = a. b;\n```"
        );
    }

    #[test]
    fn sentence_offsets_map_back_past_headings_and_placeholders() {
        let text = "# Titel\nSiehe https://a.de/x. Weiter geht es.";
        let prepared = prepare(text, &LanguageConfig::german(), DecorationHandling::Locate);
        assert_eq!(prepared.headings.len(), 1);
        assert_eq!(
            texts(&prepared),
            vec!["Siehe https://a.de/x.", "Weiter geht es."]
        );
        let spans: Vec<&str> = prepared
            .sentences
            .iter()
            .map(|s| s.original.slice(text))
            .collect();
        assert_eq!(spans, vec!["Siehe https://a.de/x.", "Weiter geht es."]);
    }

    #[test]
    fn stripped_sentences_are_rewrapped() {
        let prepared = prepare(
            "*First sentence here. Second sentence here.*",
            &LanguageConfig::german(),
            DecorationHandling::Strip,
        );
        assert_eq!(
            texts(&prepared),
            vec!["*First sentence here.*", "*Second sentence here.*"]
        );
        assert!(
            prepared
                .sentences
                .iter()
                .all(|s| s.wrapped_in == Some(Decoration::Emphasis) && s.decoration == Some(0))
        );
    }

    #[test]
    fn located_decorations_group_sentences() {
        let text = "Vor. **Eins. Zwei.** Nach.";
        let prepared = prepare(text, &LanguageConfig::german(), DecorationHandling::Locate);
        let regions: Vec<Option<usize>> =
            prepared.sentences.iter().map(|s| s.decoration).collect();
        assert_eq!(regions, vec![None, Some(0), Some(0), None]);
        assert_eq!(prepared.decorations.len(), 1);
        assert_eq!(prepared.decorations[0].span.slice(text), "**Eins. Zwei.**");
    }

    #[test]
    fn standalone_urls_are_flagged() {
        let prepared = prepare(
            "Lies das.\nhttps://example.com/artikel\nDanke.",
            &LanguageConfig::german(),
            DecorationHandling::Strip,
        );
        let flags: Vec<bool> = prepared
            .sentences
            .iter()
            .map(|s| s.is_standalone_url)
            .collect();
        assert_eq!(flags, vec![false, true, false]);
    }
}
