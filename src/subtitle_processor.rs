use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: SubRip transcript parsing and caption lookup

// @const: Position argument regex (HH:MM:SS, MM:SS, with optional ,mmm/.mmm)
static CLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d+)(?:[,.](\d{1,3}))?$").unwrap()
});

/// A timed subtitle line with inclusive start/end playback offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionWindow {
    // @field: Start offset in ms (inclusive)
    pub start_ms: u64,

    // @field: End offset in ms (inclusive)
    pub end_ms: u64,

    // @field: Caption text, joined with newlines for multi-line blocks
    pub text: String,
}

impl CaptionWindow {
    /// Create a new caption window
    pub fn new(start_ms: u64, end_ms: u64, text: &str) -> Self {
        CaptionWindow {
            start_ms,
            end_ms,
            text: text.to_string(),
        }
    }

    /// True when the playback position falls inside this window
    pub fn contains(&self, position_ms: u64) -> bool {
        self.start_ms <= position_ms && position_ms <= self.end_ms
    }

    /// Format a millisecond offset as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for CaptionWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {}  {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms),
            self.text.replace('\n', " / ")
        )
    }
}

/// Ordered sequence of caption windows loaded from one transcript
#[derive(Debug, Default)]
pub struct CaptionTrack {
    /// Source file the track was loaded from, when known
    pub source_file: Option<PathBuf>,

    /// Caption windows in source order
    pub windows: Vec<CaptionWindow>,
}

impl CaptionTrack {
    /// Parse a transcript held in memory
    pub fn from_transcript(content: &str) -> Self {
        CaptionTrack {
            source_file: None,
            windows: parse_transcript(content),
        }
    }

    /// Load and parse a transcript from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        let windows = parse_transcript(&content);
        debug!("Parsed {} caption windows from {}", windows.len(), path.display());

        Ok(CaptionTrack {
            source_file: Some(path.to_path_buf()),
            windows,
        })
    }

    /// Active caption at a playback position.
    ///
    /// The first window in source order whose inclusive interval contains the
    /// position wins; when windows overlap this is deliberate tie-breaking by
    /// source order, not a correctness guarantee.
    pub fn caption_at(&self, position_ms: u64) -> Option<&CaptionWindow> {
        self.windows.iter().find(|w| w.contains(position_ms))
    }

    /// True when the track holds no windows
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Parse a SubRip transcript into caption windows.
///
/// Blocks are scanned sequentially: a line that parses as an integer starts a
/// block, the following line is split on the arrow separator into two
/// timestamps, and subsequent non-blank lines accumulate as caption text until
/// a blank line or end of input. Malformed timestamp fields default to zero
/// rather than failing the parse, which can produce wrong timing windows for
/// damaged input. Blocks without any text are skipped. Source order is
/// preserved; windows are not re-sorted by start time.
pub fn parse_transcript(content: &str) -> Vec<CaptionWindow> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut windows = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim().parse::<u64>().is_ok() {
            i += 1;
            if i >= lines.len() {
                break;
            }

            let time_line = lines[i].trim();
            let times: Vec<&str> = time_line.split(" --> ").collect();
            if times.len() == 2 {
                let start_ms = parse_block_timestamp(times[0].trim());
                let end_ms = parse_block_timestamp(times[1].trim());
                i += 1;

                let mut text_lines = Vec::new();
                while i < lines.len() && !lines[i].trim().is_empty() {
                    text_lines.push(lines[i].trim());
                    i += 1;
                }

                if !text_lines.is_empty() {
                    windows.push(CaptionWindow::new(start_ms, end_ms, &text_lines.join("\n")));
                }
            }
        }
        i += 1;
    }

    windows
}

/// Parse a block timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds.
///
/// Fields that fail to parse contribute zero; a line that is not three
/// colon-separated parts yields zero outright.
fn parse_block_timestamp(timestamp: &str) -> u64 {
    let normalized = timestamp.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return 0;
    }

    let hours: u64 = parts[0].parse().unwrap_or(0);
    let minutes: u64 = parts[1].parse().unwrap_or(0);
    let seconds_parts: Vec<&str> = parts[2].split('.').collect();
    let seconds: u64 = seconds_parts[0].parse().unwrap_or(0);
    let millis: u64 = if seconds_parts.len() > 1 {
        seconds_parts[1].parse().unwrap_or(0)
    } else {
        0
    };

    hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis
}

/// Parse a user-supplied playback position: plain milliseconds, `MM:SS`,
/// or `HH:MM:SS` with an optional `,mmm`/`.mmm` suffix
pub fn parse_position(input: &str) -> Result<u64> {
    let trimmed = input.trim();

    if let Ok(ms) = trimmed.parse::<u64>() {
        return Ok(ms);
    }

    let caps = CLOCK_REGEX
        .captures(trimmed)
        .with_context(|| format!("Invalid position: {}", input))?;

    let hours: u64 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse())?;
    let minutes: u64 = caps[2].parse()?;
    let seconds: u64 = caps[3].parse()?;
    let millis: u64 = caps.get(4).map_or(Ok(0), |m| m.as_str().parse())?;

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Path of the same-stem sidecar subtitle for a video, if one exists on disk
pub fn sidecar_for<P: AsRef<Path>>(video_path: P) -> Option<PathBuf> {
    let sidecar = video_path.as_ref().with_extension("srt");
    if sidecar.is_file() { Some(sidecar) } else { None }
}

/// All `.srt` files in a directory, sorted by file name
pub fn list_directory_subtitles<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut subtitles = Vec::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
        {
            subtitles.push(path);
        }
    }

    subtitles.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    Ok(subtitles)
}
