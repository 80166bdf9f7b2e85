use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Caption languages in order of preference (BCP 47 style tags)
    #[serde(default = "default_preferred_languages")]
    pub preferred_languages: Vec<String>,

    /// Paragraph segmentation settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Caption cleaning settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Remote caption download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Tuning constants of the paragraph segmenter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Sentences with more words than this are re-chunked
    #[serde(default = "default_long_sentence_words")]
    pub long_sentence_words: usize,

    /// Chunk size used when re-chunking a long sentence
    #[serde(default = "default_sentence_chunk_words")]
    pub sentence_chunk_words: usize,

    /// Word count closing a paragraph of punctuated captions
    #[serde(default = "default_punctuated_paragraph_words")]
    pub punctuated_paragraph_words: usize,

    /// Word count closing a paragraph of unpunctuated captions
    #[serde(default = "default_cadence_paragraph_words")]
    pub cadence_paragraph_words: usize,

    /// Line openers that start a new paragraph in unpunctuated captions.
    /// Matched case-insensitively as whole words at the start of a line.
    #[serde(default = "default_discourse_markers")]
    pub discourse_markers: Vec<String>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            long_sentence_words: default_long_sentence_words(),
            sentence_chunk_words: default_sentence_chunk_words(),
            punctuated_paragraph_words: default_punctuated_paragraph_words(),
            cadence_paragraph_words: default_cadence_paragraph_words(),
            discourse_markers: default_discourse_markers(),
        }
    }
}

/// Caption cleaning options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizerConfig {
    /// Remove inline cue tags such as `<c>` or `<00:00:01.000>`
    #[serde(default = "default_true")]
    pub strip_cue_tags: bool,

    /// Drop a line identical to the previously kept one
    #[serde(default)]
    pub collapse_repeated_lines: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_cue_tags: true,
            collapse_repeated_lines: false,
        }
    }
}

/// Settings for downloading caption tracks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with caption requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_preferred_languages() -> Vec<String> {
    ["es", "es-419", "es-ES", "es-LA", "en"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_long_sentence_words() -> usize {
    35
}

fn default_sentence_chunk_words() -> usize {
    25
}

fn default_punctuated_paragraph_words() -> usize {
    60
}

fn default_cadence_paragraph_words() -> usize {
    70
}

fn default_discourse_markers() -> Vec<String> {
    [
        // Spanish
        "Pero", "Así", "Entonces", "Sin embargo", "Además", "Por lo tanto", "De modo que",
        // English
        "But", "So", "Then", "However", "Also", "Therefore", "So that",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("captionflow/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.preferred_languages.is_empty() {
            return Err(anyhow!("At least one preferred caption language is required"));
        }

        for tag in &self.preferred_languages {
            if !crate::language_utils::is_valid_language_tag(tag) {
                return Err(anyhow!("Invalid language tag in preferred_languages: {}", tag));
            }
        }

        self.segmentation.validate()?;

        if self.fetch.timeout_secs == 0 {
            return Err(anyhow!("fetch.timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}

impl SegmentationConfig {
    /// Check that the thresholds describe a usable segmentation
    pub fn validate(&self) -> Result<()> {
        if self.long_sentence_words == 0
            || self.sentence_chunk_words == 0
            || self.punctuated_paragraph_words == 0
            || self.cadence_paragraph_words == 0
        {
            return Err(anyhow!("Segmentation word thresholds must be greater than zero"));
        }

        if self.sentence_chunk_words >= self.long_sentence_words {
            return Err(anyhow!(
                "sentence_chunk_words ({}) must be smaller than long_sentence_words ({})",
                self.sentence_chunk_words,
                self.long_sentence_words
            ));
        }

        if self.discourse_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(anyhow!("Discourse markers must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            preferred_languages: default_preferred_languages(),
            segmentation: SegmentationConfig::default(),
            normalizer: NormalizerConfig::default(),
            fetch: FetchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
