use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use log::{debug, error};
use crate::app_config::Config;
use crate::caption_normalizer::{CaptionNormalizer, CaptionPayload, SourceFormat};
use crate::errors::CaptionError;
use crate::paragraph_segmenter::{Paragraph, ParagraphSegmenter};

// @module: Transcript markup rendering and pipeline entry points

/// Render paragraphs, each followed by an empty spacer paragraph
pub fn render_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .filter(|p| !p.text().trim().is_empty())
        .map(|p| format!("<p>{}</p>\n<p></p>\n", p.text()))
        .collect()
}

/// Render the placeholder paragraph of a failure
pub fn render_placeholder(error: &CaptionError) -> String {
    format!("<p>{}</p>", error.placeholder())
}

/// Render a result, falling back to the placeholder on failure
pub fn render_result(result: Result<Vec<Paragraph>, CaptionError>) -> String {
    match result {
        Ok(paragraphs) if !paragraphs.is_empty() => render_paragraphs(&paragraphs),
        Ok(_) => render_placeholder(&CaptionError::EmptyInput),
        Err(e) => {
            match e {
                CaptionError::EmptyInput | CaptionError::NotAvailable => debug!("{}", e),
                _ => error!("{}", e),
            }
            render_placeholder(&e)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run a pipeline stage, converting a panic into a processing failure
fn guarded<T>(stage: &str, f: impl FnOnce() -> Result<T, CaptionError>) -> Result<T, CaptionError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!("Unexpected fault during {}: {}", stage, message);
        Err(CaptionError::ProcessingFailure(format!("{}: {}", stage, message)))
    })
}

/// Normalizes payloads and renders them as transcript markup
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuilder {
    normalizer: CaptionNormalizer,
    segmenter: ParagraphSegmenter,
}

impl TranscriptBuilder {
    /// Create a builder from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalizer: CaptionNormalizer::new(config.normalizer.clone()),
            segmenter: ParagraphSegmenter::new(config.segmentation.clone()),
        }
    }

    /// Segment already cleaned lines
    pub fn paragraphs<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<Paragraph>, CaptionError> {
        guarded("segmentation", || self.segmenter.segment(lines))
    }

    /// Normalize a payload of a known format, then segment it
    pub fn paragraphs_from_payload(&self, payload: &CaptionPayload, format: SourceFormat) -> Result<Vec<Paragraph>, CaptionError> {
        let lines = guarded("normalization", || self.normalizer.normalize(payload, format))?;
        self.paragraphs(&lines)
    }

    /// Detect the format of a raw document, normalize it, then segment it
    pub fn paragraphs_from_document(&self, document: &str) -> Result<Vec<Paragraph>, CaptionError> {
        let lines = guarded("normalization", || self.normalizer.normalize_document(document))?;
        self.paragraphs(&lines)
    }

    /// Markup for cleaned lines; never fails
    pub fn build_markup<S: AsRef<str>>(&self, lines: &[S]) -> String {
        render_result(self.paragraphs(lines))
    }

    /// Markup for a payload of a known format; never fails
    pub fn markup_from_payload(&self, payload: &CaptionPayload, format: SourceFormat) -> String {
        render_result(self.paragraphs_from_payload(payload, format))
    }

    /// Markup for a raw caption document; never fails
    pub fn markup_from_document(&self, document: &str) -> String {
        render_result(self.paragraphs_from_document(document))
    }
}

/// Build transcript markup from cleaned caption lines with default settings
pub fn build_transcript_markup<S: AsRef<str>>(lines: &[S]) -> String {
    TranscriptBuilder::default().build_markup(lines)
}

/// Build transcript markup from a payload, degrading every failure to a placeholder
pub fn transcript_markup_from_payload(payload: &CaptionPayload, format: SourceFormat, config: &Config) -> String {
    TranscriptBuilder::from_config(config).markup_from_payload(payload, format)
}

/// Build transcript markup from a raw caption document of any known format
pub fn transcript_markup_from_document(document: &str, config: &Config) -> String {
    TranscriptBuilder::from_config(config).markup_from_document(document)
}
