use std::sync::LazyLock;

use regex::Regex;

/// Horizontal rule syntax knowledge: three or more of the same `-`, `*` or
/// `_`, optionally separated by spaces.
pub struct HorizontalRule;

static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]{0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("Invalid horizontal rule regex")
});

impl HorizontalRule {
    /// Multi-line variant of [`HorizontalRule::is_rule`] for `find_iter`.
    pub const LINE_PATTERN: &'static str =
        r"(?m)^[ \t]{0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$";

    pub fn is_rule(line: &str) -> bool {
        RULE.is_match(line.trim_end_matches(['\r', '\n']))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("---", true)]
    #[case("***", true)]
    #[case("___", true)]
    #[case("- - -", true)]
    #[case("-----  ", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("--- text", false)]
    fn rules(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(HorizontalRule::is_rule(line), expected);
    }
}
