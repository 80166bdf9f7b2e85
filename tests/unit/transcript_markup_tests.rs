/*!
 * Tests for transcript markup rendering and placeholders
 */

use captionflow::app_config::{Config, SegmentationConfig};
use captionflow::caption_normalizer::{CaptionPayload, SourceFormat, TimedTextItem};
use captionflow::errors::{
    CaptionError, PLACEHOLDER_EMPTY_INPUT, PLACEHOLDER_MALFORMED_PAYLOAD, PLACEHOLDER_UNRECOGNIZED_FORMAT,
};
use captionflow::paragraph_segmenter::segment;
use captionflow::transcript_markup::{
    TranscriptBuilder, build_transcript_markup, render_paragraphs, render_placeholder, transcript_markup_from_document,
    transcript_markup_from_payload,
};
use crate::common;

#[test]
fn test_buildTranscriptMarkup_withShortPunctuatedLines_shouldRenderOneParagraphAndSpacer() {
    let markup = build_transcript_markup(&["hello world.", "This is great!", "Yes it is."]);
    assert_eq!(markup, "<p>Hello world. This is great! Yes it is.</p>\n<p></p>\n");
}

#[test]
fn test_buildTranscriptMarkup_withEmptyInput_shouldRenderSinglePlaceholder() {
    let lines: Vec<String> = Vec::new();
    let markup = build_transcript_markup(&lines);

    assert_eq!(markup, format!("<p>{}</p>", PLACEHOLDER_EMPTY_INPUT));
    assert_eq!(markup.matches("<p>").count(), 1);
    assert!(!markup.contains("<p></p>"));
}

#[test]
fn test_buildTranscriptMarkup_withCadenceInput_shouldFollowEachParagraphWithSpacer() {
    let lines = common::words(80, "w");
    let markup = build_transcript_markup(&lines);

    assert_eq!(markup.matches("<p></p>\n").count(), 2);
    assert!(markup.starts_with("<p>W1 w2"));
    assert!(markup.ends_with("w80</p>\n<p></p>\n"));
}

#[test]
fn test_renderParagraphs_shouldConcatenateInOrder() {
    let paragraphs = segment(&["first part", "Second part"]).unwrap();
    assert_eq!(
        render_paragraphs(&paragraphs),
        "<p>First part</p>\n<p></p>\n<p>Second part</p>\n<p></p>\n"
    );
    assert_eq!(render_paragraphs(&[]), "");
}

#[test]
fn test_renderPlaceholder_shouldWrapMessageInParagraph() {
    assert_eq!(
        render_placeholder(&CaptionError::UnrecognizedFormat),
        format!("<p>{}</p>", PLACEHOLDER_UNRECOGNIZED_FORMAT)
    );
}

#[test]
fn test_markupFromDocument_withWebVtt_shouldRenderCleanTranscript() {
    let markup = transcript_markup_from_document(common::SAMPLE_VTT, &Config::default());
    assert_eq!(markup, "<p>Hola a todos. Bienvenidos al canal!</p>\n<p></p>\n");
}

#[test]
fn test_markupFromDocument_withEventDocument_shouldUseCadenceAndMarkers() {
    let markup = transcript_markup_from_document(common::SAMPLE_JSON3, &Config::default());
    assert_eq!(
        markup,
        "<p>Hola a todos</p>\n<p></p>\n<p>Pero hoy vamos a ver algo nuevo</p>\n<p></p>\n"
    );
}

#[test]
fn test_markupFromDocument_withUnknownFormat_shouldRenderUnrecognizedPlaceholder() {
    let markup = transcript_markup_from_document("<html>not captions</html>", &Config::default());
    assert_eq!(markup, format!("<p>{}</p>", PLACEHOLDER_UNRECOGNIZED_FORMAT));
}

#[test]
fn test_markupFromPayload_withBrokenEventDocument_shouldRenderMalformedPlaceholder() {
    let payload = CaptionPayload::Document(r#"{"events": [oops]}"#.to_string());
    let markup = transcript_markup_from_payload(&payload, SourceFormat::EventDocument, &Config::default());
    assert_eq!(markup, format!("<p>{}</p>", PLACEHOLDER_MALFORMED_PAYLOAD));
}

#[test]
fn test_markupFromPayload_withOnlyAnnotations_shouldRenderEmptyPlaceholder() {
    let payload = CaptionPayload::Items(vec![TimedTextItem::new("[Music]"), TimedTextItem::new("[Applause]")]);
    let markup = transcript_markup_from_payload(&payload, SourceFormat::TimedItems, &Config::default());
    assert_eq!(markup, format!("<p>{}</p>", PLACEHOLDER_EMPTY_INPUT));
}

#[test]
fn test_transcriptBuilder_fromConfig_shouldApplySegmentationSettings() {
    let config = Config {
        segmentation: SegmentationConfig {
            cadence_paragraph_words: 2,
            ..SegmentationConfig::default()
        },
        ..Config::default()
    };
    let builder = TranscriptBuilder::from_config(&config);

    let markup = builder.build_markup(&["one", "two", "three"]);
    assert_eq!(markup, "<p>One two</p>\n<p></p>\n<p>Three</p>\n<p></p>\n");
}

#[test]
fn test_transcriptBuilder_isDeterministic() {
    let builder = TranscriptBuilder::default();
    let lines = common::words(150, "d");
    assert_eq!(builder.build_markup(&lines), builder.build_markup(&lines));
}
