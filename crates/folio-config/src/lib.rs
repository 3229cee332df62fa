use folio_engine::{
    BlockMarkerConfig, LanguageConfig, Locale, SegmentationConfig,
    language::{DEFAULT_LINE_BREAK_PATTERN, DEFAULT_POEM_MAX_LINE_CHARS},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid line break pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid page sizes: {0}")]
    InvalidPageSizes(String),
}

/// Word budgets for `folio blocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    pub short_sentence_words: usize,
    pub max_merged_words: usize,
}

impl Default for BlockSettings {
    fn default() -> Self {
        let defaults = BlockMarkerConfig::default();
        Self {
            short_sentence_words: defaults.short_sentence_words,
            max_merged_words: defaults.max_merged_words,
        }
    }
}

/// Verse detection overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoemSettings {
    pub max_line_chars: usize,
    pub line_break_pattern: String,
}

impl Default for PoemSettings {
    fn default() -> Self {
        Self {
            max_line_chars: DEFAULT_POEM_MAX_LINE_CHARS,
            line_break_pattern: DEFAULT_LINE_BREAK_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Locale,
    /// Where page files go; next to the source file when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub pages: SegmentationConfig,
    pub blocks: BlockSettings,
    pub poem: PoemSettings,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the output directory
        config.output_dir = config
            .output_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/folio");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Checks the page budgets: all sizes non-zero, target not above max.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pages = &self.pages;
        if pages.target_page_size_chars == 0 || pages.max_page_size_chars == 0 {
            return Err(ConfigError::InvalidPageSizes(
                "page sizes must be greater than zero".to_string(),
            ));
        }
        if pages.target_page_size_chars > pages.max_page_size_chars {
            return Err(ConfigError::InvalidPageSizes(format!(
                "target {} exceeds max {}",
                pages.target_page_size_chars, pages.max_page_size_chars
            )));
        }
        if self.blocks.max_merged_words == 0 {
            log::warn!("max_merged_words is 0, no sentences will be merged");
        }
        Ok(())
    }

    pub fn segmentation_config(&self) -> SegmentationConfig {
        self.pages.clone()
    }

    /// Locale defaults with the verse overrides applied.
    pub fn language_config(&self) -> Result<LanguageConfig, ConfigError> {
        let pattern = &self.poem.line_break_pattern;
        let poem_line_break = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(LanguageConfig {
            poem_line_break,
            poem_max_line_chars: self.poem.max_line_chars,
            ..LanguageConfig::for_locale(self.language)
        })
    }

    pub fn block_marker_config(&self) -> Result<BlockMarkerConfig, ConfigError> {
        Ok(BlockMarkerConfig {
            short_sentence_words: self.blocks.short_sentence_words,
            max_merged_words: self.blocks.max_merged_words,
            language: self.language_config()?,
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
