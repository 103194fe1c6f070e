use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Library scan settings
    #[serde(default)]
    pub library: LibraryConfig,

    /// Player session settings
    #[serde(default)]
    pub player: PlayerConfig,

    /// Resume store settings
    #[serde(default)]
    pub resume: ResumeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for scanning and organizing the video library
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LibraryConfig {
    // @field: Recognized video file extensions (lowercase, no dot)
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    // @field: Follow symlinks while scanning
    #[serde(default)]
    pub follow_links: bool,

    // @field: Probe durations with ffprobe during scan
    #[serde(default = "default_true")]
    pub probe_durations: bool,

    // @field: Per-file ffprobe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            follow_links: false,
            probe_durations: true,
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Settings for the playback-session core
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerConfig {
    /// Seek step applied per gesture increment, in milliseconds
    #[serde(default = "default_seek_step_ms")]
    pub seek_step_ms: i64,

    /// Horizontal scroll distance (pixels) required per seek increment
    #[serde(default = "default_scroll_px_per_step")]
    pub scroll_px_per_step: f32,

    /// Idle time after which accumulated seeking resets, in milliseconds
    #[serde(default = "default_swipe_reset_ms")]
    pub swipe_reset_ms: u64,

    /// Minimum horizontal travel before a scroll counts as a seek gesture
    #[serde(default = "default_scroll_activation_px")]
    pub scroll_activation_px: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            seek_step_ms: default_seek_step_ms(),
            scroll_px_per_step: default_scroll_px_per_step(),
            swipe_reset_ms: default_swipe_reset_ms(),
            scroll_activation_px: default_scroll_activation_px(),
        }
    }
}

/// Settings for the playback-position resume store
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResumeConfig {
    /// Database file path; the platform data directory is used when unset
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Autoplay when no saved playing state exists for a video
    #[serde(default = "default_true")]
    pub autoplay_default: bool,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            autoplay_default: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "avi", "mov"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_seek_step_ms() -> i64 {
    10_000
}

fn default_scroll_px_per_step() -> f32 {
    150.0
}

fn default_swipe_reset_ms() -> u64 {
    1000
}

fn default_scroll_activation_px() -> f32 {
    50.0
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.library.video_extensions.is_empty() {
            return Err(anyhow!("At least one video extension must be configured"));
        }

        if self
            .library
            .video_extensions
            .iter()
            .any(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(anyhow!(
                "Video extensions must be non-empty and written without a leading dot"
            ));
        }

        if self.player.seek_step_ms <= 0 {
            return Err(anyhow!("Seek step must be positive"));
        }

        if self.player.scroll_px_per_step <= 0.0 {
            return Err(anyhow!("Scroll distance per seek step must be positive"));
        }

        Ok(())
    }

    /// Check whether a lowercase extension is a recognized video extension
    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.library
            .video_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            library: LibraryConfig::default(),
            player: PlayerConfig::default(),
            resume: ResumeConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
