/// ATX heading syntax knowledge.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Heading level if the line is a heading: 1–6 leading `#` followed by
    /// whitespace or an asterisk (`###### **SPEAKER:**` style headings).
    pub fn level(line: &str) -> Option<usize> {
        let hashes = line.chars().take_while(|&c| c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL {
            return None;
        }
        // '#' is one byte, so `hashes` is also a byte index
        match line[hashes..].chars().next() {
            Some(c) if c.is_whitespace() || c == '*' => Some(hashes),
            _ => None,
        }
    }

    pub fn is_heading(line: &str) -> bool {
        Self::level(line).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", Some(1))]
    #[case("###### **SPEAKER:**", Some(6))]
    #[case("##\tTabbed", Some(2))]
    #[case("####### seven", None)]
    #[case("#hashtag", None)]
    #[case(" # indented", None)]
    #[case("#", None)]
    fn heading_levels(#[case] line: &str, #[case] expected: Option<usize>) {
        assert_eq!(Heading::level(line), expected);
    }
}
