//! # Language Configuration
//!
//! Locale-specific knowledge used by the scanner and annotator: which glyphs
//! open, close or toggle a quotation, and how verse lines are recognised.
//! Two configurations ship: German (the default) and English.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Supported segmentation locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "de")]
    German,
    #[serde(rename = "en")]
    English,
}

/// Default hard line break indicator: two trailing spaces, a trailing
/// backslash or an HTML `<br>`.
pub const DEFAULT_LINE_BREAK_PATTERN: &str = r"(?:  +|\\|<br\s*/?>)$";

/// Lines shorter than this (in chars, trimmed) may be verse.
pub const DEFAULT_POEM_MAX_LINE_CHARS: usize = 60;

static DEFAULT_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_LINE_BREAK_PATTERN).expect("Invalid line break regex"));

/// Quote classes and verse detection parameters for one locale.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    pub locale: Locale,
    /// Glyphs that open a quotation.
    pub opening_quotes: Vec<char>,
    /// Glyphs that close a quotation.
    pub closing_quotes: Vec<char>,
    /// Glyphs used for both roles; they toggle.
    pub neutral_quotes: Vec<char>,
    /// Matches a line ending in a hard line break.
    pub poem_line_break: Regex,
    /// Trimmed lines shorter than this are verse candidates.
    pub poem_max_line_chars: usize,
}

impl LanguageConfig {
    /// German: „…“, ‚…‘ and »…« pairs, `"` toggles.
    pub fn german() -> Self {
        Self {
            locale: Locale::German,
            opening_quotes: vec!['„', '»', '‚'],
            closing_quotes: vec!['“', '‘', '«'],
            neutral_quotes: vec!['"'],
            poem_line_break: DEFAULT_LINE_BREAK.clone(),
            poem_max_line_chars: DEFAULT_POEM_MAX_LINE_CHARS,
        }
    }

    /// English: “…” and «…» pairs, `"` toggles. Single quotes are left out
    /// because ’ doubles as the apostrophe.
    pub fn english() -> Self {
        Self {
            locale: Locale::English,
            opening_quotes: vec!['“', '«'],
            closing_quotes: vec!['”', '»'],
            neutral_quotes: vec!['"'],
            poem_line_break: DEFAULT_LINE_BREAK.clone(),
            poem_max_line_chars: DEFAULT_POEM_MAX_LINE_CHARS,
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::German => Self::german(),
            Locale::English => Self::english(),
        }
    }

    /// Classifies a character against the three quote classes.
    pub fn quote_kind(&self, c: char) -> Option<QuoteKind> {
        if self.opening_quotes.contains(&c) {
            Some(QuoteKind::Opening)
        } else if self.closing_quotes.contains(&c) {
            Some(QuoteKind::Closing)
        } else if self.neutral_quotes.contains(&c) {
            Some(QuoteKind::Neutral)
        } else {
            None
        }
    }

    /// True for any glyph of the three quote classes.
    pub fn is_quote(&self, c: char) -> bool {
        self.quote_kind(c).is_some()
    }

    /// True if the line ends in a hard line break.
    pub fn has_line_break(&self, line: &str) -> bool {
        self.poem_line_break.is_match(line)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::german()
    }
}

/// Role of a quote glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Opening,
    Closing,
    Neutral,
}
