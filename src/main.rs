// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::library::GalleryItem;
use crate::playback::format_clock;
use crate::subtitle_processor::{list_directory_subtitles, parse_position, sidecar_for};

mod app_config;
mod app_controller;
mod errors;
mod library;
mod media_scanner;
mod playback;
mod store;
mod subtitle_processor;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory for videos and print the organized folder tree
    Scan {
        /// Directory root to scan
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Skip duration probing (faster, durations show as 00:00)
        #[arg(long)]
        no_probe: bool,

        /// Open a folder within the tree before printing (repeatable)
        #[arg(long, value_name = "NAME")]
        open: Vec<String>,
    },

    /// Inspect subtitles for a video or subtitle file
    Subs {
        /// Video file, subtitle file, or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Show the active caption at a position (milliseconds or MM:SS)
        #[arg(long, value_name = "POSITION")]
        at: Option<String>,
    },

    /// Manage saved playback positions
    Resume {
        #[command(subcommand)]
        action: ResumeAction,
    },

    /// Generate shell completions for plusplay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ResumeAction {
    /// List all saved playback positions
    List,

    /// Show the saved position for one video
    Show {
        /// Video path
        #[arg(value_name = "VIDEO")]
        video: PathBuf,
    },

    /// Clear the saved position for one video
    Clear {
        /// Video path
        #[arg(value_name = "VIDEO")]
        video: PathBuf,
    },

    /// Clear all saved positions
    ClearAll,
}

/// Plus Play - video library scanner and player companion
///
/// Scans directories for video files, organizes them into a browsable folder
/// tree, inspects SubRip subtitles, and manages saved playback positions.
#[derive(Parser, Debug)]
#[command(name = "plusplay")]
#[command(version = "1.0.0")]
#[command(about = "Video library scanner and player companion")]
#[command(long_about = "Plus Play scans directories for video files, organizes them into a
browsable folder tree, inspects SubRip subtitles, and manages saved playback
positions.

EXAMPLES:
    plusplay scan ~/Videos                    # Scan and print the folder tree
    plusplay scan --no-probe ~/Videos         # Skip ffprobe duration probing
    plusplay scan --open Movies ~/Videos      # Print the Movies folder listing
    plusplay subs movie.srt                   # Parse and print caption windows
    plusplay subs movie.mkv --at 01:23        # Active caption at 1m23s
    plusplay resume list                      # Show saved playback positions
    plusplay completions bash > plusplay.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "plusplay", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let config_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_level));
    }

    let config = load_or_create_config(&cli.config_path, cli.log_level.as_ref())?;

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    match cli.command {
        Commands::Scan { root, no_probe, open } => run_scan(config, root, no_probe, open).await,
        Commands::Subs { path, at } => run_subs(config, path, at).await,
        Commands::Resume { action } => run_resume(config, action).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

/// Load the configuration file, creating a default one when it does not exist
fn load_or_create_config(
    config_path: &str,
    log_level: Option<&CliLogLevel>,
) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        if let Some(level) = log_level {
            config.log_level = level.clone().into();
        }

        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(level) = log_level {
            config.log_level = level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

async fn run_scan(
    mut config: Config,
    root: PathBuf,
    no_probe: bool,
    open: Vec<String>,
) -> Result<()> {
    if no_probe {
        config.library.probe_durations = false;
    }

    let controller = Controller::with_config(config)?;
    let tree = controller.scan_library(&root).await?;

    if tree.total_videos() == 0 {
        println!("No videos found.");
        return Ok(());
    }

    if open.is_empty() {
        print!("{}", Controller::format_tree(&tree));
        return Ok(());
    }

    // Navigate into the requested folders and print that listing
    let mut browser = library::GalleryBrowser::new(&tree);
    for name in &open {
        if !browser.enter(name) {
            return Err(anyhow!("No such folder: {}", name));
        }
    }

    println!("{}", browser.title());
    for item in browser.items() {
        match item {
            GalleryItem::Back => println!("  .."),
            GalleryItem::Folder(folder) => {
                println!("  {}/  ({} videos)", folder.name, folder.total_videos())
            }
            GalleryItem::Video(video) => {
                println!("  {}  [{}]", video.name, format_clock(video.duration_ms))
            }
        }
    }

    Ok(())
}

async fn run_subs(config: Config, path: PathBuf, at: Option<String>) -> Result<()> {
    let controller = Controller::with_config(config)?;

    let track = if path.is_dir() {
        // Directory: list available subtitle files, as the in-player picker does
        let subtitles = list_directory_subtitles(&path)?;
        if subtitles.is_empty() {
            println!("No .srt subtitle files found in {}", path.display());
            return Ok(());
        }
        for subtitle in &subtitles {
            println!("{}", subtitle.display());
        }
        return Ok(());
    } else if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("srt")) {
        // Explicit subtitle load surfaces failures
        controller.load_subtitle(&path)?
    } else {
        // Video: auto-discover the same-stem sidecar
        match sidecar_for(&path) {
            Some(sidecar) => {
                info!("Using sidecar subtitle: {}", sidecar.display());
                controller.load_subtitle(&sidecar)?
            }
            None => {
                println!("No sidecar subtitle found for {}", path.display());
                return Ok(());
            }
        }
    };

    if track.is_empty() {
        warn!("Transcript parsed to zero caption windows");
        return Ok(());
    }

    match at {
        Some(position) => {
            let position_ms = parse_position(&position)?;
            match track.caption_at(position_ms) {
                Some(window) => println!("{}", window),
                None => println!("(no caption at {})", format_clock(position_ms)),
            }
        }
        None => {
            for window in &track.windows {
                println!("{}", window);
            }
            println!("{} caption windows", track.windows.len());
        }
    }

    Ok(())
}

async fn run_resume(config: Config, action: ResumeAction) -> Result<()> {
    let controller = Controller::with_config(config)?;
    let store = controller.store();

    match action {
        ResumeAction::List => {
            let states = store.list().await?;
            if states.is_empty() {
                println!("No saved playback positions.");
                return Ok(());
            }
            for (video_path, state) in states {
                println!(
                    "{}  at {}  ({})",
                    video_path,
                    format_clock(state.position_ms),
                    if state.was_playing { "playing" } else { "paused" }
                );
            }
        }
        ResumeAction::Show { video } => match store.get(&video).await? {
            Some(state) => println!(
                "{}  at {}  ({})",
                video.display(),
                format_clock(state.position_ms),
                if state.was_playing { "playing" } else { "paused" }
            ),
            None => println!("No saved position for {}", video.display()),
        },
        ResumeAction::Clear { video } => {
            store.clear(&video).await?;
            println!("Cleared saved position for {}", video.display());
        }
        ResumeAction::ClearAll => {
            let removed = store.clear_all().await?;
            println!("Cleared {} saved positions", removed);
        }
    }

    Ok(())
}
