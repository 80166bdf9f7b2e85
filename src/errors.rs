/*!
 * Error types for the captionflow library.
 *
 * Caption failures never reach the reader as errors: every `CaptionError`
 * maps to a short placeholder message that is rendered in place of the
 * transcript. The remaining types cover caption sources and the CLI.
 */

use thiserror::Error;

/// Placeholder shown when the video has no caption track in any preferred language
pub const PLACEHOLDER_NOT_AVAILABLE: &str = "❌ Este video no tiene subtítulos disponibles.";

/// Placeholder shown when there is nothing to segment
pub const PLACEHOLDER_EMPTY_INPUT: &str = "❌ No se pudieron procesar los subtítulos.";

/// Placeholder shown when the payload is not a known caption transport
pub const PLACEHOLDER_UNRECOGNIZED_FORMAT: &str = "❌ Formato de subtítulos no reconocido.";

/// Placeholder shown when a structured event document cannot be parsed
pub const PLACEHOLDER_MALFORMED_PAYLOAD: &str = "❌ No se pudieron procesar subtítulos automáticos.";

/// Placeholder shown for any other failure
pub const PLACEHOLDER_PROCESSING_FAILURE: &str = "❌ Error al procesar subtítulos.";

/// Errors that can occur while turning captions into a transcript
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// No caption track exists in any preferred language
    #[error("No caption track available in the preferred languages")]
    NotAvailable,

    /// The line sequence is empty, or produced no paragraphs
    #[error("No caption text to segment")]
    EmptyInput,

    /// The payload shape is not one of the known transports
    #[error("Unrecognized caption format")]
    UnrecognizedFormat,

    /// The payload has a known shape but its content does not parse
    #[error("Malformed caption payload: {0}")]
    MalformedPayload(String),

    /// Any other unexpected fault
    #[error("Caption processing failed: {0}")]
    ProcessingFailure(String),
}

impl CaptionError {
    /// User-visible placeholder text for this failure
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::NotAvailable => PLACEHOLDER_NOT_AVAILABLE,
            Self::EmptyInput => PLACEHOLDER_EMPTY_INPUT,
            Self::UnrecognizedFormat => PLACEHOLDER_UNRECOGNIZED_FORMAT,
            Self::MalformedPayload(_) => PLACEHOLDER_MALFORMED_PAYLOAD,
            Self::ProcessingFailure(_) => PLACEHOLDER_PROCESSING_FAILURE,
        }
    }
}

/// Errors raised by caption sources while fetching tracks or metadata
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP request could not be completed
    #[error("Caption request failed: {0}")]
    RequestFailed(String),

    /// The remote server answered with an error status
    #[error("Caption server responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },

    /// A source document could not be parsed
    #[error("Failed to parse source document: {0}")]
    ParseError(String),

    /// Reading a local source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SourceError> for CaptionError {
    fn from(error: SourceError) -> Self {
        Self::ProcessingFailure(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a caption source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error from caption processing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
