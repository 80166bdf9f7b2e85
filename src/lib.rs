/*!
 * # captionflow - caption reflow into readable transcripts
 *
 * A Rust library that turns video caption tracks into paragraph-structured
 * transcript markup.
 *
 * ## Features
 *
 * - Read caption payloads in several transports:
 *   - WebVTT and SRT cue files
 *   - json3 style event documents (`events` / `segs`)
 *   - Lists of timed text items from transcript APIs
 * - Strip bracketed annotations such as `[Music]` and inline cue tags
 * - Reflow punctuated captions sentence by sentence
 * - Reflow unpunctuated auto-captions by word cadence and discourse markers
 * - Degrade every failure to a short placeholder paragraph
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `caption_normalizer`: Payload decoding and line cleaning
 * - `paragraph_segmenter`: Paragraph boundary heuristics
 * - `transcript_markup`: Rendering and the total pipeline entry points
 * - `caption_source`: Track selection, metadata and caption downloads
 * - `file_utils`: File system operations
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types and placeholder messages
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod caption_normalizer;
pub mod paragraph_segmenter;
pub mod transcript_markup;
pub mod caption_source;
pub mod file_utils;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, SegmentationConfig, NormalizerConfig};
pub use caption_normalizer::{CaptionLine, CaptionNormalizer, CaptionPayload, LineSequence, SourceFormat, TimedTextItem, normalize};
pub use paragraph_segmenter::{Paragraph, ParagraphSegmenter, SegmentationStrategy, segment};
pub use transcript_markup::{TranscriptBuilder, build_transcript_markup, transcript_markup_from_document, transcript_markup_from_payload};
pub use caption_source::{CaptionSource, FileCaptionSource, InfoJsonSource, Transcript, VideoMetadata, fetch_transcript};
pub use errors::{AppError, CaptionError, SourceError};
