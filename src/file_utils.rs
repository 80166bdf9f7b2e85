use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use crate::errors::AppError;

// @module: File and directory utilities

/// Caption file kinds recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFileKind {
    /// WebVTT or SRT cue file
    Cues,
    /// JSON document (json3 events, timed items or yt-dlp info)
    Json,
    /// Anything else; content sniffing decides
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Input file is present before any work starts
    pub fn require_input_file<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
        if Self::file_exists(&path) {
            Ok(())
        } else {
            Err(AppError::File(format!("Input file does not exist: {:?}", path.as_ref())))
        }
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a transcript next to its input
    // @params: input_file, extension
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        // Strip a trailing ".info" left by yt-dlp info JSON names
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let stem = stem.strip_suffix(".info").unwrap_or(&stem);

        let mut output_filename = stem.to_string();
        output_filename.push_str(".transcript.");
        output_filename.push_str(extension.trim_start_matches('.'));

        input_file.with_file_name(output_filename)
    }

    /// Guess a caption file kind from its extension
    pub fn caption_file_kind<P: AsRef<Path>>(path: P) -> CaptionFileKind {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "vtt" | "webvtt" | "srt" => CaptionFileKind::Cues,
            "json" | "json3" => CaptionFileKind::Json,
            _ => CaptionFileKind::Unknown,
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
