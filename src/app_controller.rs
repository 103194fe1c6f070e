use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::path::Path;

use crate::app_config::Config;
use crate::library::{organize_folders, DirectoryNode, MediaEntry};
use crate::media_scanner::MediaScanner;
use crate::playback::{format_clock, Playlist};
use crate::store::{ResumeState, ResumeStore};
use crate::subtitle_processor::{sidecar_for, CaptionTrack};

// @module: Application controller for the video gallery workflow

/// Everything needed to start playing a video: the folder playlist, the
/// restored position and playing state, and any auto-loaded captions
pub struct SessionStart {
    /// Videos of the containing folder, positioned at the opened video
    pub playlist: Playlist,

    /// Position to seek to before starting (0 when no saved state)
    pub start_position_ms: u64,

    /// Whether playback should start immediately
    pub autoplay: bool,

    /// Sidecar captions, when a same-stem `.srt` parsed successfully
    pub captions: Option<CaptionTrack>,
}

/// Main application controller for the video gallery
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Resume-position store
    store: ResumeStore,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let store = match &config.resume.db_path {
            Some(path) => ResumeStore::new(crate::store::StoreConnection::new(path)?),
            None => ResumeStore::new_default()?,
        };

        Ok(Self { config, store })
    }

    /// Create a controller backed by an in-memory store (for testing)
    pub fn new_for_test() -> Result<Self> {
        Ok(Self {
            config: Config::default(),
            store: ResumeStore::new_in_memory()?,
        })
    }

    /// The resume-position store
    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    /// Scan a directory root and organize the results into a tree
    pub async fn scan_library<P: AsRef<Path>>(&self, root: P) -> Result<DirectoryNode> {
        let root = root.as_ref();
        info!("Scanning for videos under: {}", root.display());

        let scanner = MediaScanner::new(self.config.library.clone());
        let progress = ProgressBar::new(0).with_style(
            ProgressStyle::with_template("{spinner} Probing durations {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let entries = scanner.scan_with_progress(root, Some(progress)).await?;

        if entries.is_empty() {
            warn!("No videos found under: {}", root.display());
        } else {
            info!("Found {} videos", entries.len());
        }

        Ok(organize_folders(&entries))
    }

    /// Open a video for playback.
    ///
    /// Builds the playlist from its folder's videos, restores the saved
    /// position and playing state, and auto-loads the same-stem sidecar
    /// subtitle. Sidecar load failures are ignored, matching the gallery's
    /// error posture for automatic loads.
    pub async fn open_session(
        &self,
        folder_videos: Vec<MediaEntry>,
        video_path: &Path,
    ) -> Result<SessionStart> {
        let playlist = Playlist::new(folder_videos, video_path);

        let start_position_ms = self.store.position_or_zero(video_path).await?;
        let autoplay = self
            .store
            .was_playing_or_default(video_path, self.config.resume.autoplay_default)
            .await?;

        let captions = match sidecar_for(video_path) {
            Some(sidecar) => match CaptionTrack::load(&sidecar) {
                Ok(track) if !track.is_empty() => {
                    debug!("Auto-loaded sidecar subtitle: {}", sidecar.display());
                    Some(track)
                }
                Ok(_) => None,
                Err(e) => {
                    warn!("Ignoring unreadable sidecar subtitle: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(SessionStart {
            playlist,
            start_position_ms,
            autoplay,
            captions,
        })
    }

    /// Persist the playback state when the session is interrupted
    pub async fn save_progress(
        &self,
        video_path: &Path,
        position_ms: u64,
        was_playing: bool,
    ) -> Result<()> {
        self.store
            .save(
                video_path,
                &ResumeState {
                    position_ms,
                    was_playing,
                },
            )
            .await
    }

    /// Handle a video playing to the end: the saved state is cleared and the
    /// next playlist entry, if any, is returned
    pub async fn complete(
        &self,
        playlist: &mut Playlist,
        video_path: &Path,
    ) -> Result<Option<MediaEntry>> {
        self.store.clear(video_path).await?;
        Ok(playlist.next().cloned())
    }

    /// Handle a deliberate exit: the saved state is cleared
    pub async fn user_exit(&self, video_path: &Path) -> Result<()> {
        self.store.clear(video_path).await
    }

    /// Load a user-selected subtitle file, surfacing failures.
    ///
    /// Unlike the sidecar auto-load, an explicit load reports read errors to
    /// the caller.
    pub fn load_subtitle(&self, path: &Path) -> Result<CaptionTrack> {
        CaptionTrack::load(path).context("Failed to load subtitle file")
    }

    /// Render a directory tree as an indented listing with durations
    pub fn format_tree(node: &DirectoryNode) -> String {
        let mut out = String::new();
        Self::format_node(node, 0, &mut out);
        out
    }

    fn format_node(node: &DirectoryNode, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);

        if depth > 0 {
            let _ = writeln!(out, "{}{}/", indent, node.name);
        }

        for child in &node.subdirs {
            Self::format_node(child, depth + 1, out);
        }

        for video in &node.videos {
            let _ = writeln!(
                out,
                "{}  {}  [{}]",
                indent,
                video.name,
                format_clock(video.duration_ms)
            );
        }
    }
}
