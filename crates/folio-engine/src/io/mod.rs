use crate::navigation::render_page_file;
use crate::pages::{SegmentationResult, SourceName};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid output directory: {0}")]
    InvalidOutputDir(String),
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a file, creating parent directories as needed
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Source name for a file on disk, derived from its file name
pub fn source_name(path: &Path) -> SourceName {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    SourceName::from_file_name(&file_name)
}

/// `<core> (<n>)<suffix>.md`
pub fn page_file_name(source: &SourceName, page_index: usize) -> String {
    format!("{}.md", source.page_stem(page_index))
}

/// Writes every page of `result` into `dir`, each opened by its navigation
/// line. Returns the written paths in page order.
pub fn write_pages(
    dir: &Path,
    source: &SourceName,
    result: &SegmentationResult,
) -> Result<Vec<PathBuf>, IoError> {
    if dir.exists() && !dir.is_dir() {
        return Err(IoError::InvalidOutputDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let page_count = result.pages.len();
    let mut written = Vec::with_capacity(page_count);
    for page in &result.pages {
        let path = dir.join(page_file_name(source, page.page_index));
        write_file(&path, &render_page_file(source, page, page_count))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
