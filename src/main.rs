// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use captionflow::app_config::{self, Config};
use captionflow::caption_source::{CaptionSource, FileCaptionSource, InfoJsonSource, Transcript, fetch_transcript};
use captionflow::caption_normalizer::SourceFormat;
use captionflow::errors::AppError;
use captionflow::file_utils::{CaptionFileKind, FileManager};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reflow a local caption file (WebVTT, SRT, json3 or timed items JSON)
    Reflow(OutputArgs),

    /// Select, download and reflow the caption track listed in a yt-dlp info JSON file
    Fetch(OutputArgs),

    /// Generate shell completions for captionflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Input file to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Write the transcript markup to this file instead of stdout
    #[arg(short, long, conflicts_with = "auto_output")]
    output: Option<PathBuf>,

    /// Write the transcript next to the input as <name>.transcript.html
    #[arg(short, long)]
    auto_output: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// captionflow - caption reflow into readable transcripts
///
/// Turns caption tracks into paragraph-structured transcript markup.
#[derive(Parser, Debug)]
#[command(name = "captionflow")]
#[command(version)]
#[command(about = "Reflow video captions into readable transcript paragraphs")]
#[command(long_about = "captionflow turns caption tracks into paragraph-structured HTML transcripts.

EXAMPLES:
    captionflow reflow talk.es.vtt                  # Print transcript markup for a caption file
    captionflow reflow -a talk.json3                # Write talk.transcript.html
    captionflow fetch talk.info.json -o talk.html   # Pick and download the best track
    captionflow --languages en,es fetch talk.info.json
    captionflow completions bash > captionflow.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Preferred caption languages, comma separated (e.g. 'es,es-419,en')
    #[arg(long, value_delimiter = ',', global = true)]
    languages: Option<Vec<String>>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; log::set_max_level narrows it later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "captionflow", &mut std::io::stdout());
            Ok(())
        }
        Commands::Reflow(args) => {
            let config = load_config(&cli)?;
            warn_if_info_document(&args.input_path);
            let source = FileCaptionSource::new();
            run_pipeline(&source, args, &config).await?;
            Ok(())
        }
        Commands::Fetch(args) => {
            let config = load_config(&cli)?;
            let source = InfoJsonSource::new(&config.fetch);
            run_pipeline(&source, args, &config).await?;
            Ok(())
        }
    }
}

/// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(languages) = &cli.languages {
        config.preferred_languages = languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }

    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

/// Point users at `fetch` when they pass an info JSON document to `reflow`
fn warn_if_info_document(path: &Path) {
    if FileManager::caption_file_kind(path) != CaptionFileKind::Json {
        return;
    }

    if let Ok(content) = FileManager::read_to_string(path) {
        if SourceFormat::detect(&content).is_none() && content.contains("\"automatic_captions\"") {
            warn!("{:?} looks like a video info document; use `captionflow fetch` instead", path);
        }
    }
}

async fn run_pipeline(source: &dyn CaptionSource, args: &OutputArgs, config: &Config) -> Result<(), AppError> {
    FileManager::require_input_file(&args.input_path)?;

    let output_path = match (&args.output, args.auto_output) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(FileManager::generate_output_path(&args.input_path, "html")),
        (None, false) => None,
    };

    if let Some(path) = &output_path {
        if path.exists() && !args.force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", path);
            return Ok(());
        }
    }

    let video_ref = args.input_path.to_string_lossy().to_string();
    let transcript = fetch_transcript(source, &video_ref, config).await;
    log_metadata(&transcript);

    match output_path {
        Some(path) => {
            FileManager::write_to_file(&path, &transcript.markup)?;
            info!("Success: {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout();
            write!(stdout, "{}", transcript.markup)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn log_metadata(transcript: &Transcript) {
    let metadata = &transcript.metadata;
    info!(
        "{} by {} ({})",
        metadata.title.as_deref().unwrap_or("Untitled"),
        metadata.uploader.as_deref().unwrap_or("unknown uploader"),
        metadata
            .upload_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "undated".to_string())
    );
}
