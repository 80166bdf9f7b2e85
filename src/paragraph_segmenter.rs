/*!
 * Paragraph segmentation of caption lines.
 *
 * Captions with terminal punctuation are grouped sentence by sentence;
 * auto-generated captions without punctuation are grouped by a word cadence
 * and cut early when the next line looks like a new thought.
 */

use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use crate::app_config::SegmentationConfig;
use crate::errors::CaptionError;

// @const: Terminal punctuation followed by whitespace
static SENTENCE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.?!]\s+").unwrap()
});

// @const: Runs of whitespace
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Which heuristic decides paragraph boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStrategy {
    /// Group whole sentences
    Punctuated,
    /// Group lines by word cadence and discourse markers
    Cadence,
}

impl SegmentationStrategy {
    /// Pick the strategy for a whitespace-normalized transcript
    pub fn classify(full_text: &str) -> Self {
        if full_text.contains(TERMINAL_PUNCTUATION) {
            Self::Punctuated
        } else {
            Self::Cadence
        }
    }
}

/// A finished paragraph, capitalized at its first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
}

impl Paragraph {
    /// Paragraph text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of whitespace separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl AsRef<str> for Paragraph {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Uppercase the first character only; the rest keeps its casing
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join lines with one space, collapse whitespace runs and trim
pub fn normalize_whitespace<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join(" ");
    WHITESPACE_REGEX.replace_all(&joined, " ").trim().to_string()
}

/// Split after terminal punctuation followed by whitespace; punctuation stays
/// with the preceding sentence
pub fn split_sentences(full_text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK_REGEX.find_iter(full_text) {
        // the punctuation mark is a single ASCII byte
        let end = m.start() + 1;
        sentences.push(full_text[start..end].trim());
        start = m.end();
    }
    sentences.push(full_text[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

// @struct: Running state of one segmentation pass
#[derive(Debug, Default)]
struct ParagraphAccumulator {
    buffer: Vec<String>,
    word_count: usize,
    paragraphs: Vec<Paragraph>,
}

impl ParagraphAccumulator {
    fn push(&mut self, piece: &str) {
        self.word_count += piece.split_whitespace().count();
        self.buffer.push(piece.to_string());
    }

    fn close(&mut self) {
        let text = capitalize_first(&self.buffer.join(" "));
        if !text.is_empty() {
            self.paragraphs.push(Paragraph { text });
        }
        self.buffer.clear();
        self.word_count = 0;
    }

    fn finish(mut self) -> Vec<Paragraph> {
        if !self.buffer.is_empty() {
            self.close();
        }
        self.paragraphs
    }
}

/// Splits cleaned caption lines into paragraphs
#[derive(Debug, Clone)]
pub struct ParagraphSegmenter {
    config: SegmentationConfig,
    discourse_marker_regex: Option<Regex>,
}

impl Default for ParagraphSegmenter {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

impl ParagraphSegmenter {
    /// Create a segmenter with the given thresholds and discourse markers
    pub fn new(config: SegmentationConfig) -> Self {
        let discourse_marker_regex = Self::compile_discourse_markers(&config.discourse_markers);
        Self {
            config,
            discourse_marker_regex,
        }
    }

    fn compile_discourse_markers(markers: &[String]) -> Option<Regex> {
        let alternatives: Vec<String> = markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return None;
        }

        let pattern = format!(r"(?i)^(?:{})\b", alternatives.join("|"));
        match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Ignoring discourse markers, pattern failed to compile: {}", e);
                None
            }
        }
    }

    /// Segmentation settings in use
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Split caption lines into paragraphs
    pub fn segment<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<Paragraph>, CaptionError> {
        if lines.is_empty() {
            return Err(CaptionError::EmptyInput);
        }

        let full_text = normalize_whitespace(lines);
        let strategy = SegmentationStrategy::classify(&full_text);
        debug!("Segmenting {} caption lines with {:?} strategy", lines.len(), strategy);

        let paragraphs = match strategy {
            SegmentationStrategy::Punctuated => self.segment_punctuated(&full_text),
            SegmentationStrategy::Cadence => self.segment_cadence(lines),
        };

        if paragraphs.is_empty() {
            warn!("Caption lines produced no paragraphs");
            return Err(CaptionError::EmptyInput);
        }

        debug!("Produced {} paragraphs", paragraphs.len());
        Ok(paragraphs)
    }

    /// Break a sentence longer than the threshold into fixed-size word chunks
    pub fn rechunk_sentence(&self, sentence: &str) -> Vec<String> {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() > self.config.long_sentence_words {
            words
                .chunks(self.config.sentence_chunk_words.max(1))
                .map(|chunk| chunk.join(" "))
                .collect()
        } else {
            vec![sentence.to_string()]
        }
    }

    fn segment_punctuated(&self, full_text: &str) -> Vec<Paragraph> {
        let limit = self.config.punctuated_paragraph_words;

        split_sentences(full_text)
            .into_iter()
            .flat_map(|sentence| self.rechunk_sentence(sentence))
            .fold(ParagraphAccumulator::default(), |mut acc, piece| {
                acc.push(&piece);
                if acc.word_count >= limit {
                    acc.close();
                }
                acc
            })
            .finish()
    }

    fn segment_cadence<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Paragraph> {
        let limit = self.config.cadence_paragraph_words;
        let mut acc = ParagraphAccumulator::default();

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            acc.push(line);

            let next = lines.get(i + 1).map(|l| l.as_ref().trim()).unwrap_or("");
            let should_cut = acc.word_count >= limit || (!next.is_empty() && self.opens_new_thought(next));

            if should_cut {
                acc.close();
            }
        }

        acc.finish()
    }

    /// Whether a line starts with an uppercase letter or a discourse marker
    pub fn opens_new_thought(&self, line: &str) -> bool {
        if line.chars().next().is_some_and(char::is_uppercase) {
            return true;
        }

        self.discourse_marker_regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(line))
    }
}

/// Segment lines with the default thresholds
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Paragraph>, CaptionError> {
    ParagraphSegmenter::default().segment(lines)
}
