//! # Text Primitives
//!
//! Coordinate-space plumbing shared by every pipeline stage.
//!
//! - **`span`**: `Span`, a half-open byte range
//! - **`lines`**: `lines_with_spans` line iteration with byte spans
//! - **`remap`**: `rewrite` + `EditMap` for replace-and-remap transforms
//! - **`intervals`**: first-match-wins overlap resolution

pub mod intervals;
pub mod lines;
pub mod remap;
pub mod span;

pub use intervals::{Spanned, first_wins};
pub use lines::{LineRef, line_index_at, lines_with_spans};
pub use remap::{Edit, EditMap, OffsetChain, rewrite};
pub use span::Span;
