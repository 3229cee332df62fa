use std::sync::LazyLock;

use regex::Regex;

/// An inline emphasis style and its delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    StrongEmphasis,
    Strong,
    StrongUnderscore,
    Strikethrough,
    Highlight,
    Emphasis,
    EmphasisUnderscore,
}

impl Decoration {
    /// Longest delimiters first: a `**` pair must be claimed before `*`.
    pub const ALL: [Decoration; 7] = [
        Decoration::StrongEmphasis,
        Decoration::Strong,
        Decoration::StrongUnderscore,
        Decoration::Strikethrough,
        Decoration::Highlight,
        Decoration::Emphasis,
        Decoration::EmphasisUnderscore,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Decoration::StrongEmphasis => "***",
            Decoration::Strong => "**",
            Decoration::StrongUnderscore => "__",
            Decoration::Strikethrough => "~~",
            Decoration::Highlight => "==",
            Decoration::Emphasis => "*",
            Decoration::EmphasisUnderscore => "_",
        }
    }

    /// Underscore delimiters only count at word boundaries (`snake_case`).
    pub fn needs_word_boundary(self) -> bool {
        matches!(
            self,
            Decoration::StrongUnderscore | Decoration::EmphasisUnderscore
        )
    }

    /// Single-line span pattern; group 1 is the payload, which neither starts
    /// nor ends with whitespace and never contains the delimiter character.
    pub(crate) fn pattern(self) -> &'static Regex {
        match self {
            Decoration::StrongEmphasis => &STRONG_EMPHASIS,
            Decoration::Strong => &STRONG,
            Decoration::StrongUnderscore => &STRONG_UNDERSCORE,
            Decoration::Strikethrough => &STRIKETHROUGH,
            Decoration::Highlight => &HIGHLIGHT,
            Decoration::Emphasis => &EMPHASIS,
            Decoration::EmphasisUnderscore => &EMPHASIS_UNDERSCORE,
        }
    }
}

fn span_regex(delimiter: &str, class_char: &str) -> Regex {
    let d = regex::escape(delimiter);
    let pattern =
        format!(r"{d}([^{class_char}\s](?:[^{class_char}\n]*?[^{class_char}\s])?){d}");
    Regex::new(&pattern).expect("Invalid decoration regex")
}

static STRONG_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| span_regex("***", r"*"));
static STRONG: LazyLock<Regex> = LazyLock::new(|| span_regex("**", r"*"));
static STRONG_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| span_regex("__", "_"));
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| span_regex("~~", "~"));
static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| span_regex("==", "="));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| span_regex("*", r"*"));
static EMPHASIS_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| span_regex("_", "_"));
