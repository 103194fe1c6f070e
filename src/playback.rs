use crate::app_config::PlayerConfig;
use crate::library::MediaEntry;

// @module: Playback-session core: seek translation, playlist, time display

/// Action resolved from a double tap, based on which screen third was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    /// Left third: seek backward one step
    SeekBackward,
    /// Middle third: toggle play/pause
    TogglePlayPause,
    /// Right third: seek forward one step
    SeekForward,
}

/// Resolve a double tap at horizontal position `x` on a surface of `width`
pub fn resolve_double_tap(x: f32, width: f32) -> TapAction {
    let third = width / 3.0;
    if x < third {
        TapAction::SeekBackward
    } else if x > width - third {
        TapAction::SeekForward
    } else {
        TapAction::TogglePlayPause
    }
}

/// Apply a relative seek, clamped into `[0, duration]`.
///
/// A zero duration means the media is not ready; the position is left alone.
pub fn clamp_seek(current_ms: u64, delta_ms: i64, duration_ms: u64) -> u64 {
    if duration_ms == 0 {
        return current_ms;
    }
    (current_ms as i64 + delta_ms).clamp(0, duration_ms as i64) as u64
}

/// Format a playback clock as `MM:SS`, folding hours into minutes.
///
/// Lossy by design: 1h02m renders as `62:00`.
pub fn format_clock(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    format!("{:02}:{:02}", minutes, seconds % 60)
}

/// Feedback text for an accumulated seek, e.g. `+30s` or `-10s`
pub fn seek_feedback(delta_ms: i64) -> String {
    let seconds = delta_ms / 1000;
    if seconds > 0 {
        format!("+{}s", seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// A seek emitted by the accumulator for one scroll update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekUpdate {
    /// Delta to apply now, relative to the current position
    pub delta_ms: i64,

    /// Running accumulated total for this swipe sequence
    pub total_ms: i64,

    /// Display text for the accumulated total
    pub feedback: String,
}

/// Translates horizontal scroll gestures into stepped seek offsets.
///
/// Scroll distance is quantized into fixed steps (one `seek_step_ms` per
/// `scroll_px_per_step` pixels of travel). Consecutive swipes within
/// `swipe_reset_ms` of each other accumulate into one running total; a
/// direction change or idle expiry resets the total.
#[derive(Debug)]
pub struct SeekAccumulator {
    config: PlayerConfig,
    accumulated_ms: i64,
    last_direction: i8,
    last_swipe_at_ms: u64,
    scrolling: bool,
}

impl SeekAccumulator {
    /// Create an accumulator with the given player settings
    pub fn new(config: PlayerConfig) -> Self {
        SeekAccumulator {
            config,
            accumulated_ms: 0,
            last_direction: 0,
            last_swipe_at_ms: 0,
            scrolling: false,
        }
    }

    /// Process one scroll update.
    ///
    /// `diff_x`/`diff_y` are the total displacement since the gesture began;
    /// `now_ms` is a monotonic timestamp in milliseconds. Returns a seek to
    /// apply when a new step threshold was crossed, `None` otherwise.
    pub fn on_scroll(&mut self, diff_x: f32, diff_y: f32, now_ms: u64) -> Option<SeekUpdate> {
        // Only mostly-horizontal movement past the activation distance counts
        if diff_x.abs() <= diff_y.abs() || diff_x.abs() <= self.config.scroll_activation_px {
            return None;
        }

        if !self.scrolling {
            self.scrolling = true;
            if now_ms.saturating_sub(self.last_swipe_at_ms) >= self.config.swipe_reset_ms {
                self.accumulated_ms = 0;
                self.last_direction = 0;
            }
        }

        let direction: i8 = if diff_x > 0.0 { 1 } else { -1 };
        let increments = (diff_x.abs() / self.config.scroll_px_per_step) as i64;
        let target_ms = increments * self.config.seek_step_ms * i64::from(direction);

        if target_ms == 0 || target_ms == self.accumulated_ms {
            return None;
        }

        if direction != self.last_direction && self.last_direction != 0 {
            self.accumulated_ms = 0;
        }

        let delta_ms = target_ms - self.accumulated_ms;
        self.accumulated_ms = target_ms;
        self.last_direction = direction;
        self.last_swipe_at_ms = now_ms;

        Some(SeekUpdate {
            delta_ms,
            total_ms: self.accumulated_ms,
            feedback: seek_feedback(self.accumulated_ms),
        })
    }

    /// Mark the gesture as finished (touch release or fling)
    pub fn end_gesture(&mut self) {
        self.scrolling = false;
    }

    /// Expire the accumulated total after idle time; returns true when reset
    pub fn maybe_expire(&mut self, now_ms: u64) -> bool {
        if self.accumulated_ms != 0
            && now_ms.saturating_sub(self.last_swipe_at_ms) >= self.config.swipe_reset_ms
        {
            self.accumulated_ms = 0;
            self.last_direction = 0;
            true
        } else {
            false
        }
    }

    /// Current accumulated total in milliseconds
    pub fn accumulated_ms(&self) -> i64 {
        self.accumulated_ms
    }
}

/// Ordered videos of one folder with a current index
#[derive(Debug, Clone)]
pub struct Playlist {
    videos: Vec<MediaEntry>,
    index: usize,
}

impl Playlist {
    /// Create a playlist positioned at the video matching `start_path`.
    ///
    /// Falls back to the first video when the path is not in the list.
    pub fn new(videos: Vec<MediaEntry>, start_path: &std::path::Path) -> Self {
        let index = videos
            .iter()
            .position(|v| v.path == start_path)
            .unwrap_or(0);
        Playlist { videos, index }
    }

    /// Number of videos in the playlist
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    /// True when the playlist holds no videos
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// The video at the current index
    pub fn current(&self) -> Option<&MediaEntry> {
        self.videos.get(self.index)
    }

    /// Current index into the playlist
    pub fn index(&self) -> usize {
        self.index
    }

    /// True when a previous video exists
    pub fn has_previous(&self) -> bool {
        self.videos.len() > 1 && self.index > 0
    }

    /// True when a next video exists
    pub fn has_next(&self) -> bool {
        self.videos.len() > 1 && self.index + 1 < self.videos.len()
    }

    /// Step to the previous video, if any
    pub fn previous(&mut self) -> Option<&MediaEntry> {
        if self.has_previous() {
            self.index -= 1;
            self.current()
        } else {
            None
        }
    }

    /// Step to the next video, if any
    pub fn next(&mut self) -> Option<&MediaEntry> {
        if self.has_next() {
            self.index += 1;
            self.current()
        } else {
            None
        }
    }
}
