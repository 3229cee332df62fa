/// Which delimiter a fenced code block was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// Fenced code block syntax knowledge.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Returns the fence kind if the line opens or closes a fence.
    /// Up to three spaces of indentation are allowed.
    pub fn sig(line: &str) -> Option<FenceKind> {
        let t = line.trim_end_matches(['\r', '\n']);
        let indent = t.len() - t.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let t = &t[indent..];
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceKind::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceKind::Tildes)
        } else {
            None
        }
    }

    pub fn closes(kind: FenceKind, sig: Option<FenceKind>) -> bool {
        sig == Some(kind)
    }
}

/// Line-by-line fence state: feed every line in order and learn whether it
/// belongs to a fenced code block (delimiters included).
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceTracker {
    open: Option<FenceKind>,
}

impl FenceTracker {
    /// Advances over `line`, returning true if the line is part of a fence.
    pub fn step(&mut self, line: &str) -> bool {
        let sig = CodeFence::sig(line);
        match self.open {
            Some(kind) => {
                if CodeFence::closes(kind, sig) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = sig;
                sig.is_some()
            }
        }
    }

    /// True while inside an unterminated fence.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}
