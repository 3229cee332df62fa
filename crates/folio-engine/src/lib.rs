pub mod annotate;
pub mod blocks;
pub mod config;
pub mod decoration;
pub mod extract;
pub mod io;
pub mod kinds;
pub mod language;
pub mod navigation;
pub mod pages;
pub mod pipeline;
pub mod protect;
pub mod scan;
pub mod sentence;
pub mod text;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{BlockSplit, split_str_in_blocks};
pub use config::{BlockMarkerConfig, SegmentationConfig};
pub use io::*;
pub use language::{LanguageConfig, Locale};
pub use navigation::{render_page_file, strip_navigation_backlink};
pub use pages::{PageSegment, SegmentationResult, SourceName, segment_content};
