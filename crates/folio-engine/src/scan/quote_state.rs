use crate::language::{LanguageConfig, QuoteKind};

/// Stack of unclosed opening quote glyphs. The depth is the stack height, so
/// `depth() == open_marks().len()` holds by construction and can never go
/// negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteState {
    open_marks: Vec<char>,
}

impl QuoteState {
    pub fn depth(&self) -> usize {
        self.open_marks.len()
    }

    pub fn open_marks(&self) -> &[char] {
        &self.open_marks
    }

    /// Applies one character in place.
    pub fn push_char(&mut self, c: char, language: &LanguageConfig) {
        match language.quote_kind(c) {
            Some(QuoteKind::Opening) => self.open_marks.push(c),
            Some(QuoteKind::Closing) => {
                self.open_marks.pop();
            }
            Some(QuoteKind::Neutral) => {
                if self.open_marks.pop().is_none() {
                    self.open_marks.push(c);
                }
            }
            None => {}
        }
    }

    /// Produces the state after `line`, leaving `self` untouched.
    pub fn advance_line(&self, line: &str, language: &LanguageConfig) -> QuoteState {
        let mut next = self.clone();
        for c in line.chars() {
            next.push_char(c, language);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_matches_stack_after_every_char() {
        let language = LanguageConfig::german();
        let mut state = QuoteState::default();
        for c in "„»‚\"“«“““\"„\"".chars() {
            state.push_char(c, &language);
            assert_eq!(state.depth(), state.open_marks().len());
        }
    }

    #[test]
    fn nested_marks_are_remembered() {
        let language = LanguageConfig::german();
        let state = QuoteState::default().advance_line("„Er rief: »Halt!", &language);
        assert_eq!(state.open_marks(), &['„', '»']);
    }

    #[test]
    fn neutral_closes_whatever_is_open() {
        let language = LanguageConfig::german();
        let state = QuoteState::default().advance_line("„offen \"", &language);
        assert_eq!(state.depth(), 0);
    }
}
