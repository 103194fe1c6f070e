use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use indicatif::ProgressBar;
use log::{debug, warn};
use serde_json::Value;
use tokio::process::Command;
use walkdir::WalkDir;

use crate::app_config::LibraryConfig;
use crate::library::MediaEntry;

// @module: Filesystem discovery of video files

/// Scans directory roots for video files and probes their durations
pub struct MediaScanner {
    // @field: Library settings (extensions, link policy, probing)
    config: LibraryConfig,
}

impl MediaScanner {
    /// Create a scanner with the given library settings
    pub fn new(config: LibraryConfig) -> Self {
        MediaScanner { config }
    }

    /// Scan a directory root for video files.
    ///
    /// The walk runs on a blocking worker; durations are then probed with one
    /// task per file and merged into the returned entries. Files that fail to
    /// probe keep a zero duration.
    pub async fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Vec<MediaEntry>> {
        self.scan_with_progress(root, None).await
    }

    /// Scan with an optional progress bar tracking the duration probes
    pub async fn scan_with_progress<P: AsRef<Path>>(
        &self,
        root: P,
        progress: Option<ProgressBar>,
    ) -> Result<Vec<MediaEntry>> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(anyhow!("Scan root is not a directory: {}", root.display()));
        }

        let config = self.config.clone();
        let root_for_walk = root.clone();
        let mut entries = tokio::task::spawn_blocking(move || {
            Self::walk_videos(&root_for_walk, &config)
        })
        .await
        .context("Scan task panicked")??;

        debug!("Discovered {} video files under {}", entries.len(), root.display());

        if self.config.probe_durations && !entries.is_empty() {
            if let Some(bar) = &progress {
                bar.set_length(entries.len() as u64);
            }

            // One probe task per file, joined at the end
            let timeout_secs = self.config.probe_timeout_secs;
            let probes = entries.iter().map(|entry| {
                let path = entry.path.clone();
                let bar = progress.clone();
                tokio::spawn(async move {
                    let duration = match probe_duration(&path, timeout_secs).await {
                        Ok(ms) => ms,
                        Err(e) => {
                            warn!("Duration probe failed for {}: {}", path.display(), e);
                            0
                        }
                    };
                    if let Some(bar) = bar {
                        bar.inc(1);
                    }
                    duration
                })
            });

            let durations = join_all(probes).await;
            for (entry, duration) in entries.iter_mut().zip(durations) {
                entry.duration_ms = duration.unwrap_or(0);
            }

            if let Some(bar) = &progress {
                bar.finish_and_clear();
            }
        }

        Ok(entries)
    }

    /// Walk the tree collecting video files, deduplicated by path and
    /// sorted by lowercase file name
    fn walk_videos(root: &Path, config: &LibraryConfig) -> Result<Vec<MediaEntry>> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut entries = Vec::new();

        for item in WalkDir::new(root).follow_links(config.follow_links) {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!("Skipping unreadable path during scan: {}", e);
                    continue;
                }
            };

            let path = item.path();
            if !path.is_file() || !has_video_extension(path, config) {
                continue;
            }

            if !seen.insert(path.to_path_buf()) {
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            entries.push(MediaEntry::new(&name, path, 0));
        }

        entries.sort_by_key(|e| e.name.to_lowercase());
        Ok(entries)
    }
}

/// True when the path carries one of the configured video extensions
fn has_video_extension(path: &Path, config: &LibraryConfig) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| {
            config
                .video_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&ext))
        })
}

/// Probe a media file's duration in milliseconds using ffprobe
pub async fn probe_duration(path: &Path, timeout_secs: u64) -> Result<u64> {
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(timeout_secs);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after {} seconds", timeout_secs));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout)
        .context("Failed to parse ffprobe JSON output")?;

    let seconds: f64 = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow!("No duration in ffprobe output for {}", path.display()))?;

    Ok((seconds * 1000.0) as u64)
}
