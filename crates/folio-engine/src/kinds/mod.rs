//! Markdown construct knowledge, one type per construct. Every stage asks
//! these types instead of re-encoding the syntax.

pub mod code_fence;
pub mod heading;
pub mod horizontal_rule;

pub use code_fence::{CodeFence, FenceKind, FenceTracker};
pub use heading::Heading;
pub use horizontal_rule::HorizontalRule;
