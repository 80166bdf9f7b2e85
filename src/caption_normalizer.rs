use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use log::{debug, warn};
use crate::app_config::NormalizerConfig;
use crate::errors::CaptionError;

// @module: Caption payload cleaning

// @const: Bracketed non-speech annotations such as [Music] or [Aplausos]
static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]").unwrap()
});

// @const: Runs of whitespace
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

// @const: Inline cue tags (<c>, </c>, <00:00:01.000>, <v Speaker>)
static CUE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(?:c|i|b|u|v|lang|ruby|rt)\b[^>]*>|<\d{2}:[\d:.]+>").unwrap()
});

// @const: WebVTT header metadata line (Kind: captions, X-TIMESTAMP-MAP=...)
static HEADER_METADATA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][\w-]*(?::\s|=)").unwrap()
});

// @const: Pure numeric cue index line
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

const TIME_RANGE_DELIMITER: &str = "-->";
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Remove bracketed annotations and collapse whitespace
pub fn clean_caption_text(text: &str) -> String {
    let without_annotations = ANNOTATION_REGEX.replace_all(text, "");
    WHITESPACE_REGEX
        .replace_all(&without_annotations, " ")
        .trim()
        .to_string()
}

/// Single cleaned caption line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    text: String,
}

impl CaptionLine {
    /// Clean raw caption text; `None` when nothing remains
    pub fn new(raw: &str) -> Option<Self> {
        let text = clean_caption_text(raw);
        if text.is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    /// Cleaned text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of whitespace separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl AsRef<str> for CaptionLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CaptionLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Ordered caption lines; empty means no usable captions
pub type LineSequence = Vec<CaptionLine>;

/// Timed text item as returned by transcript APIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedTextItem {
    /// Spoken text
    pub text: String,

    /// Start offset in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,

    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TimedTextItem {
    /// Create an item without timing
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Raw caption payload as handed over by a caption source
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionPayload {
    /// Undecoded caption document (WebVTT, SRT, json3 events, JSON items)
    Document(String),
    /// Already decoded timed items
    Items(Vec<TimedTextItem>),
}

/// Known caption transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Line based cue transport (WebVTT, SRT)
    LineCue,
    /// Structured event document (`events` with `segs`)
    EventDocument,
    /// List of timed text items
    TimedItems,
}

impl SourceFormat {
    /// Sniff the format of a raw caption document
    pub fn detect(document: &str) -> Option<Self> {
        let text = document.trim_start_matches(BYTE_ORDER_MARK).trim();

        if text.starts_with("WEBVTT") {
            return Some(Self::LineCue);
        }

        if text.starts_with('{') && text.contains("\"events\"") {
            return Some(Self::EventDocument);
        }

        if text.starts_with('[') {
            return Some(Self::TimedItems);
        }

        // SRT: numeric index followed by a timing line
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        match (lines.next(), lines.next()) {
            (Some(index), Some(timing))
                if INDEX_LINE_REGEX.is_match(index) && timing.contains(TIME_RANGE_DELIMITER) =>
            {
                Some(Self::LineCue)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::LineCue => "line-cue",
            Self::EventDocument => "event-document",
            Self::TimedItems => "timed-items",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Deserialize)]
struct EventDocument {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Vec<EventSegment>,
}

#[derive(Debug, Deserialize)]
struct EventSegment {
    #[serde(default)]
    utf8: String,
}

/// Turns raw caption payloads into cleaned line sequences
#[derive(Debug, Clone, Default)]
pub struct CaptionNormalizer {
    config: NormalizerConfig,
}

impl CaptionNormalizer {
    /// Create a normalizer with the given cleaning options
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalize a payload in the given format
    pub fn normalize(&self, payload: &CaptionPayload, format: SourceFormat) -> Result<LineSequence, CaptionError> {
        let lines = match (payload, format) {
            (CaptionPayload::Document(text), _) if text.trim().is_empty() => {
                warn!("Empty caption document");
                return Err(CaptionError::UnrecognizedFormat);
            }
            (CaptionPayload::Document(text), SourceFormat::LineCue) => self.normalize_line_cues(text),
            (CaptionPayload::Document(text), SourceFormat::EventDocument) => self.normalize_event_document(text)?,
            (CaptionPayload::Document(text), SourceFormat::TimedItems) => {
                let items: Vec<TimedTextItem> = serde_json::from_str(text.trim_start_matches(BYTE_ORDER_MARK))
                    .map_err(|e| CaptionError::MalformedPayload(e.to_string()))?;
                self.normalize_items(&items)
            }
            (CaptionPayload::Items(items), SourceFormat::TimedItems) => self.normalize_items(items),
            (CaptionPayload::Items(_), other) => {
                warn!("Timed items cannot be read as {} payload", other);
                return Err(CaptionError::UnrecognizedFormat);
            }
        };

        debug!("Normalized {} caption lines from {} payload", lines.len(), format);
        Ok(lines)
    }

    /// Detect the format of a raw document and normalize it
    pub fn normalize_document(&self, document: &str) -> Result<LineSequence, CaptionError> {
        let format = SourceFormat::detect(document).ok_or_else(|| {
            warn!("Unrecognized caption document format");
            CaptionError::UnrecognizedFormat
        })?;

        self.normalize(&CaptionPayload::Document(document.to_string()), format)
    }

    /// Normalize a WebVTT or SRT document
    fn normalize_line_cues(&self, text: &str) -> LineSequence {
        let mut lines = LineSequence::new();
        let mut in_header = false;
        let mut in_skipped_block = false;
        let mut at_block_start = true;
        let mut seen_first_line = false;

        for raw in text.lines() {
            let line = raw.trim_start_matches(BYTE_ORDER_MARK).trim();

            if line.is_empty() {
                in_header = false;
                in_skipped_block = false;
                at_block_start = true;
                continue;
            }

            let block_start = at_block_start;
            at_block_start = false;

            if !seen_first_line {
                seen_first_line = true;
                if line.starts_with("WEBVTT") {
                    in_header = true;
                    continue;
                }
            }

            // Header metadata ends at a blank line, a timing line or caption text
            if in_header {
                if HEADER_METADATA_REGEX.is_match(line) && !line.contains(TIME_RANGE_DELIMITER) {
                    continue;
                }
                in_header = false;
            }

            if in_skipped_block {
                continue;
            }

            if block_start && Self::is_metadata_block_start(line) {
                in_skipped_block = true;
                continue;
            }

            if INDEX_LINE_REGEX.is_match(line) || line.contains(TIME_RANGE_DELIMITER) {
                continue;
            }

            let text = if self.config.strip_cue_tags {
                CUE_TAG_REGEX.replace_all(line, "").into_owned()
            } else {
                line.to_string()
            };

            if let Some(caption) = CaptionLine::new(&text) {
                self.push_line(&mut lines, caption);
            }
        }

        lines
    }

    /// WebVTT NOTE, STYLE and REGION blocks carry no captions
    fn is_metadata_block_start(line: &str) -> bool {
        line == "NOTE"
            || line.starts_with("NOTE ")
            || line.starts_with("NOTE\t")
            || line == "STYLE"
            || line == "REGION"
    }

    /// Normalize a json3 style event document
    fn normalize_event_document(&self, text: &str) -> Result<LineSequence, CaptionError> {
        let document: EventDocument = serde_json::from_str(text.trim_start_matches(BYTE_ORDER_MARK))
            .map_err(|e| {
                warn!("Failed to parse caption event document: {}", e);
                CaptionError::MalformedPayload(e.to_string())
            })?;

        let mut lines = LineSequence::new();
        for event in &document.events {
            let phrase: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            if let Some(caption) = CaptionLine::new(&phrase) {
                self.push_line(&mut lines, caption);
            }
        }

        Ok(lines)
    }

    /// Normalize pre-timed items
    fn normalize_items(&self, items: &[TimedTextItem]) -> LineSequence {
        let mut lines = LineSequence::new();
        for item in items {
            if let Some(caption) = CaptionLine::new(&item.text) {
                self.push_line(&mut lines, caption);
            }
        }
        lines
    }

    fn push_line(&self, lines: &mut LineSequence, caption: CaptionLine) {
        if self.config.collapse_repeated_lines && lines.last() == Some(&caption) {
            return;
        }
        lines.push(caption);
    }
}

/// Normalize a payload with default cleaning options
pub fn normalize(payload: &CaptionPayload, format: SourceFormat) -> Result<LineSequence, CaptionError> {
    CaptionNormalizer::default().normalize(payload, format)
}
