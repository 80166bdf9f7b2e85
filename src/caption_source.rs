/*!
 * Caption sources.
 *
 * A caption source finds the best caption track for a video and hands its
 * raw payload to the normalizer, together with best-effort video metadata.
 * Two sources are provided:
 * - `InfoJsonSource`: reads a yt-dlp style info JSON document, picks a
 *   track by language preference and downloads it
 * - `FileCaptionSource`: reads a caption file from disk
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app_config::{Config, FetchConfig};
use crate::caption_normalizer::{CaptionPayload, SourceFormat};
use crate::errors::{CaptionError, SourceError};
use crate::language_utils;
use crate::transcript_markup::{render_placeholder, TranscriptBuilder};

/// Caption extensions the normalizer can read, in order of preference
const READABLE_EXTENSIONS: [&str; 3] = ["json3", "vtt", "srt"];

/// Whether a track was authored or generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Captions authored by a person
    Manual,
    /// Auto-generated captions
    Automatic,
}

/// One downloadable rendition of a caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFormat {
    /// File extension (`json3`, `vtt`, `srv3`, ...)
    #[serde(default)]
    pub ext: Option<String>,

    /// Download URL
    pub url: String,

    /// Display name of the track
    #[serde(default)]
    pub name: Option<String>,
}

/// A track chosen for download
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTrack {
    pub language: String,
    pub kind: TrackKind,
    pub format: TrackFormat,
}

/// Manual and automatic caption tracks keyed by language tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCatalog {
    pub manual: HashMap<String, Vec<TrackFormat>>,
    pub automatic: HashMap<String, Vec<TrackFormat>>,
}

impl TrackCatalog {
    /// Pick a track: manual before automatic, each in language preference order.
    /// When no tag matches exactly, a track sharing the primary language of a
    /// preferred tag is accepted, again manual first.
    pub fn select_track(&self, preferred_languages: &[String]) -> Option<SelectedTrack> {
        let tracks = [
            (TrackKind::Manual, &self.manual),
            (TrackKind::Automatic, &self.automatic),
        ];

        for (kind, map) in tracks {
            for lang in preferred_languages {
                if let Some(format) = map.get(lang).and_then(|formats| Self::pick_format(formats)) {
                    return Some(SelectedTrack {
                        language: lang.clone(),
                        kind,
                        format,
                    });
                }
            }
        }

        for (kind, map) in tracks {
            for lang in preferred_languages {
                let mut candidates: Vec<&String> = map
                    .keys()
                    .filter(|tag| language_utils::same_primary_language(tag, lang))
                    .collect();
                candidates.sort();

                for tag in candidates {
                    if let Some(format) = map.get(tag).and_then(|formats| Self::pick_format(formats)) {
                        debug!("No exact caption track for '{}', using related track '{}'", lang, tag);
                        return Some(SelectedTrack {
                            language: tag.clone(),
                            kind,
                            format,
                        });
                    }
                }
            }
        }

        None
    }

    /// First readable rendition, otherwise the first one listed
    fn pick_format(formats: &[TrackFormat]) -> Option<TrackFormat> {
        READABLE_EXTENSIONS
            .iter()
            .find_map(|ext| formats.iter().find(|f| f.ext.as_deref() == Some(*ext)))
            .or_else(|| formats.first())
            .cloned()
    }
}

/// Best-effort video metadata; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub upload_date: Option<NaiveDate>,
}

/// Parse a compact `YYYYMMDD` upload date
pub fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Caption payload fetched from a source
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCaptions {
    pub payload: CaptionPayload,
    pub format: SourceFormat,
    pub language: Option<String>,
    pub kind: Option<TrackKind>,
}

/// Supplies caption payloads and metadata for a video reference
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the best caption track for the preferred languages
    ///
    /// # Returns
    /// * `CaptionError::NotAvailable` when no track matches, another
    ///   `CaptionError` when the track cannot be fetched or recognized
    async fn fetch_caption_payload(
        &self,
        video_ref: &str,
        preferred_languages: &[String],
    ) -> Result<FetchedCaptions, CaptionError>;

    /// Fetch video metadata; missing data yields empty fields
    async fn fetch_video_metadata(&self, video_ref: &str) -> VideoMetadata;
}

/// Transcript markup together with the metadata of its video
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub metadata: VideoMetadata,
    pub markup: String,
}

/// Fetch captions and metadata and build the transcript markup.
/// Caption failures degrade to a placeholder; metadata is always returned.
pub async fn fetch_transcript(source: &dyn CaptionSource, video_ref: &str, config: &Config) -> Transcript {
    let metadata = source.fetch_video_metadata(video_ref).await;

    let markup = match source.fetch_caption_payload(video_ref, &config.preferred_languages).await {
        Ok(fetched) => {
            if let Some(language) = &fetched.language {
                let name = language_utils::get_language_name(language).unwrap_or_else(|_| language.clone());
                info!("Using {:?} captions in {} ({})", fetched.kind.unwrap_or(TrackKind::Manual), name, language);
            }
            TranscriptBuilder::from_config(config).markup_from_payload(&fetched.payload, fetched.format)
        }
        Err(e) => {
            warn!("Captions unavailable for {}: {}", video_ref, e);
            render_placeholder(&e)
        }
    };

    Transcript { metadata, markup }
}

// @struct: Subset of a yt-dlp info JSON document
#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    upload_date: Option<String>,
    #[serde(default)]
    subtitles: Option<HashMap<String, Vec<TrackFormat>>>,
    #[serde(default)]
    automatic_captions: Option<HashMap<String, Vec<TrackFormat>>>,
}

impl VideoInfo {
    fn catalog(&self) -> TrackCatalog {
        TrackCatalog {
            manual: self.subtitles.clone().unwrap_or_default(),
            automatic: self.automatic_captions.clone().unwrap_or_default(),
        }
    }

    fn metadata(&self) -> VideoMetadata {
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        VideoMetadata {
            title: clean(&self.title),
            uploader: clean(&self.uploader),
            upload_date: self.upload_date.as_deref().and_then(parse_upload_date),
        }
    }
}

/// Parse an info JSON document into its track catalog and metadata
pub fn parse_info_document(content: &str) -> Result<(TrackCatalog, VideoMetadata), SourceError> {
    let info: VideoInfo = serde_json::from_str(content)
        .map_err(|e| SourceError::ParseError(e.to_string()))?;
    Ok((info.catalog(), info.metadata()))
}

/// Detect the format of a downloaded or loaded caption document
fn payload_from_document(document: String) -> Result<(CaptionPayload, SourceFormat), CaptionError> {
    let format = SourceFormat::detect(&document).ok_or(CaptionError::UnrecognizedFormat)?;
    Ok((CaptionPayload::Document(document), format))
}

/// Caption source backed by yt-dlp info JSON files; `video_ref` is the file path
pub struct InfoJsonSource {
    /// HTTP client for caption downloads
    client: Client,
}

impl InfoJsonSource {
    /// Create a source with the configured timeout and user agent
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .user_agent(config.user_agent.clone())
                .build()
                .unwrap_or_default(),
        }
    }

    async fn load_info(&self, path: &str) -> Result<VideoInfo, SourceError> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|e| SourceError::ParseError(e.to_string()))
    }

    /// Download a caption document
    pub async fn download_track(&self, url: &str) -> Result<String, SourceError> {
        let url = Url::parse(url)
            .map_err(|e| SourceError::RequestFailed(format!("Invalid caption URL '{}': {}", url, e)))?;

        let response = self.client.get(url.clone())
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed(format!("Failed to download captions: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(SourceError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = response.text().await
            .map_err(|e| SourceError::RequestFailed(format!("Failed to read caption body: {}", e)))?;

        debug!("Downloaded {} bytes of captions from {}", text.len(), url.host_str().unwrap_or("unknown host"));
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl CaptionSource for InfoJsonSource {
    async fn fetch_caption_payload(
        &self,
        video_ref: &str,
        preferred_languages: &[String],
    ) -> Result<FetchedCaptions, CaptionError> {
        let info = self.load_info(video_ref).await?;

        let track = info.catalog().select_track(preferred_languages).ok_or_else(|| {
            warn!("No caption track for languages: {}", preferred_languages.join(", "));
            CaptionError::NotAvailable
        })?;

        let document = self.download_track(&track.format.url).await?;
        let (payload, format) = payload_from_document(document)?;

        Ok(FetchedCaptions {
            payload,
            format,
            language: Some(track.language),
            kind: Some(track.kind),
        })
    }

    async fn fetch_video_metadata(&self, video_ref: &str) -> VideoMetadata {
        match self.load_info(video_ref).await {
            Ok(info) => info.metadata(),
            Err(e) => {
                warn!("Video metadata unavailable: {}", e);
                VideoMetadata::default()
            }
        }
    }
}

/// Caption source reading caption files from disk; `video_ref` is the file path
#[derive(Debug, Default)]
pub struct FileCaptionSource;

impl FileCaptionSource {
    /// Create a file source
    pub fn new() -> Self {
        Self
    }

    fn title_for(path: &Path) -> Option<String> {
        path.file_stem().map(|stem| stem.to_string_lossy().to_string())
    }
}

#[async_trait]
impl CaptionSource for FileCaptionSource {
    async fn fetch_caption_payload(
        &self,
        video_ref: &str,
        _preferred_languages: &[String],
    ) -> Result<FetchedCaptions, CaptionError> {
        let document = tokio::fs::read_to_string(video_ref)
            .await
            .map_err(SourceError::from)?;
        let (payload, format) = payload_from_document(document)?;

        Ok(FetchedCaptions {
            payload,
            format,
            language: None,
            kind: None,
        })
    }

    async fn fetch_video_metadata(&self, video_ref: &str) -> VideoMetadata {
        VideoMetadata {
            title: Self::title_for(&PathBuf::from(video_ref)),
            ..VideoMetadata::default()
        }
    }
}
