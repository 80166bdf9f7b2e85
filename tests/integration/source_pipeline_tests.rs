/*!
 * Tests of the source to transcript pipeline
 */

use anyhow::Result;
use chrono::NaiveDate;
use captionflow::app_config::Config;
use captionflow::caption_normalizer::SourceFormat;
use captionflow::caption_source::{FileCaptionSource, VideoMetadata, fetch_transcript};
use captionflow::errors::CaptionError;
use crate::common;
use crate::common::mock_sources::MockCaptionSource;

fn sample_metadata() -> VideoMetadata {
    VideoMetadata {
        title: Some("Clase 1".to_string()),
        uploader: Some("Canal de prueba".to_string()),
        upload_date: NaiveDate::from_ymd_opt(2024, 3, 9),
    }
}

#[tokio::test]
async fn test_fetchTranscript_withAvailableCaptions_shouldRenderParagraphs() {
    let source = MockCaptionSource::with_document(common::SAMPLE_JSON3, SourceFormat::EventDocument)
        .with_metadata(sample_metadata());

    let transcript = fetch_transcript(&source, "abc123", &Config::default()).await;

    assert_eq!(
        transcript.markup,
        "<p>Hola a todos</p>\n<p></p>\n<p>Pero hoy vamos a ver algo nuevo</p>\n<p></p>\n"
    );
    assert_eq!(transcript.metadata, sample_metadata());
    assert_eq!(source.requests(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn test_fetchTranscript_withoutCaptions_shouldKeepMetadata() {
    let source = MockCaptionSource::failing(CaptionError::NotAvailable).with_metadata(sample_metadata());

    let transcript = fetch_transcript(&source, "abc123", &Config::default()).await;

    assert_eq!(transcript.markup, "<p>❌ Este video no tiene subtítulos disponibles.</p>");
    assert_eq!(transcript.metadata.title.as_deref(), Some("Clase 1"));
}

#[tokio::test]
async fn test_fetchTranscript_withMalformedPayload_shouldRenderPlaceholder() {
    let source = MockCaptionSource::with_document(r#"{"events": "nope"}"#, SourceFormat::EventDocument);

    let transcript = fetch_transcript(&source, "abc123", &Config::default()).await;

    assert_eq!(transcript.markup, "<p>❌ No se pudieron procesar subtítulos automáticos.</p>");
    assert_eq!(transcript.metadata, VideoMetadata::default());
}

#[tokio::test]
async fn test_fetchTranscript_withFileSource_shouldUseFileStemAsTitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "leccion.srt", common::SAMPLE_SRT)?;

    let transcript = fetch_transcript(&FileCaptionSource::new(), &path.to_string_lossy(), &Config::default()).await;

    assert_eq!(transcript.metadata.title.as_deref(), Some("leccion"));
    assert_eq!(
        transcript.markup,
        "<p>This is a test subtitle. It contains multiple entries. for testing purposes.</p>\n<p></p>\n"
    );
    Ok(())
}
