/*!
 * Tests for SubRip parsing and caption lookup
 */

use anyhow::Result;
use plusplay::subtitle_processor::{
    list_directory_subtitles, parse_position, parse_transcript, sidecar_for, CaptionTrack,
    CaptionWindow,
};

use crate::common;

/// Test the canonical two-block transcript
#[test]
fn test_parse_transcript_withTwoBlocks_shouldYieldTwoWindows() {
    let transcript = "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:05,000 --> 00:00:06,500\nWorld\n";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0], CaptionWindow::new(1000, 3000, "Hello"));
    assert_eq!(windows[1], CaptionWindow::new(5000, 6500, "World"));
}

/// Test lookup against the canonical transcript
#[test]
fn test_caption_at_withCanonicalTranscript_shouldResolveWindows() {
    let transcript = "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:05,000 --> 00:00:06,500\nWorld\n";
    let track = CaptionTrack::from_transcript(transcript);

    assert_eq!(track.caption_at(2000).map(|w| w.text.as_str()), Some("Hello"));
    assert_eq!(track.caption_at(4000), None);
    assert_eq!(track.caption_at(5500).map(|w| w.text.as_str()), Some("World"));
}

/// Test that every well-formed block produces a window with start <= end
#[test]
fn test_parse_transcript_withWellFormedBlocks_shouldKeepOrderedRanges() {
    let transcript = "\
1
00:00:01,000 --> 00:00:02,000
One

2
00:01:00,000 --> 00:01:30,500
Two

3
01:00:00,000 --> 01:00:01,000
Three
";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 3);
    for window in &windows {
        assert!(window.start_ms <= window.end_ms);
    }
    assert_eq!(windows[2].start_ms, 3_600_000);
}

/// Test that dot-separated milliseconds parse like comma-separated ones
#[test]
fn test_parse_transcript_withDotMillis_shouldParseTimestamps() {
    let transcript = "1\n00:00:01.250 --> 00:00:02.750\nDotted\n";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start_ms, 1250);
    assert_eq!(windows[0].end_ms, 2750);
}

/// Test multi-line blocks join their text with newlines
#[test]
fn test_parse_transcript_withMultiLineBlock_shouldJoinText() {
    let transcript = "1\n00:00:01,000 --> 00:00:03,000\nFirst line\nSecond line\n";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].text, "First line\nSecond line");
}

/// Test that malformed timestamp fields default to zero instead of failing
#[test]
fn test_parse_transcript_withMalformedTimestamp_shouldDefaultFieldsToZero() {
    let transcript = "1\n00:xx:02,000 --> 00:00:03,000\nDamaged\n";

    let windows = parse_transcript(transcript);

    // Minutes field is unparseable, so it contributes zero: 2s start
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start_ms, 2000);
    assert_eq!(windows[0].end_ms, 3000);
}

/// Test that a timing line without the arrow separator abandons the block
#[test]
fn test_parse_transcript_withMissingArrow_shouldSkipBlock() {
    let transcript = "1\n00:00:01,000 00:00:03,000\nLost\n\n2\n00:00:05,000 --> 00:00:06,000\nKept\n";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].text, "Kept");
}

/// Test that a block without any text lines is skipped
#[test]
fn test_parse_transcript_withEmptyTextBlock_shouldSkipBlock() {
    let transcript = "1\n00:00:01,000 --> 00:00:03,000\n\n2\n00:00:05,000 --> 00:00:06,000\nPresent\n";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].text, "Present");
}

/// Test that source order is preserved even when start times are out of order
#[test]
fn test_parse_transcript_withOutOfOrderStarts_shouldPreserveSourceOrder() {
    let transcript = "\
1
00:00:10,000 --> 00:00:12,000
Later

2
00:00:01,000 --> 00:00:03,000
Earlier
";

    let windows = parse_transcript(transcript);

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].text, "Later");
    assert_eq!(windows[1].text, "Earlier");
}

/// Test that overlapping windows resolve to the first in source order
#[test]
fn test_caption_at_withOverlappingWindows_shouldReturnFirstInSourceOrder() {
    let track = CaptionTrack {
        source_file: None,
        windows: vec![
            CaptionWindow::new(1000, 5000, "First"),
            CaptionWindow::new(2000, 6000, "Second"),
        ],
    };

    assert_eq!(track.caption_at(3000).map(|w| w.text.as_str()), Some("First"));
    assert_eq!(track.caption_at(5500).map(|w| w.text.as_str()), Some("Second"));
}

/// Test that window bounds are inclusive on both ends
#[test]
fn test_caption_at_withBoundaryPositions_shouldBeInclusive() {
    let track = CaptionTrack {
        source_file: None,
        windows: vec![CaptionWindow::new(1000, 3000, "Edge")],
    };

    assert!(track.caption_at(1000).is_some());
    assert!(track.caption_at(3000).is_some());
    assert!(track.caption_at(999).is_none());
    assert!(track.caption_at(3001).is_none());
}

/// Test SRT timestamp formatting
#[test]
fn test_format_timestamp_withMixedComponents_shouldPadFields() {
    assert_eq!(CaptionWindow::format_timestamp(0), "00:00:00,000");
    assert_eq!(CaptionWindow::format_timestamp(5_025_678), "01:23:45,678");
}

/// Test position argument parsing in its supported shapes
#[test]
fn test_parse_position_withSupportedShapes_shouldParse() -> Result<()> {
    assert_eq!(parse_position("4000")?, 4000);
    assert_eq!(parse_position("01:23")?, 83_000);
    assert_eq!(parse_position("01:02:03")?, 3_723_000);
    assert_eq!(parse_position("00:00:01,500")?, 1500);
    assert_eq!(parse_position(" 02:30 ")?, 150_000);

    assert!(parse_position("not-a-time").is_err());
    Ok(())
}

/// Test loading a track from a file
#[test]
fn test_caption_track_load_withSubtitleFile_shouldParseWindows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle_path = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "movie.srt")?;

    let track = CaptionTrack::load(&subtitle_path)?;

    assert_eq!(track.windows.len(), 3);
    assert_eq!(track.source_file.as_deref(), Some(subtitle_path.as_path()));
    Ok(())
}

/// Test that loading a missing file fails
#[test]
fn test_caption_track_load_withMissingFile_shouldFail() {
    let result = CaptionTrack::load("/nonexistent/path/movie.srt");
    assert!(result.is_err());
}

/// Test sidecar discovery next to a video file
#[test]
fn test_sidecar_for_withMatchingStem_shouldFindSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_video_stub(&dir, "movie.mp4")?;
    assert!(sidecar_for(&video).is_none());

    common::create_test_subtitle(&dir, "movie.srt")?;
    assert_eq!(sidecar_for(&video), Some(dir.join("movie.srt")));
    Ok(())
}

/// Test directory subtitle listing is filtered and sorted
#[test]
fn test_list_directory_subtitles_withMixedFiles_shouldReturnSortedSrtFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_subtitle(&dir, "beta.srt")?;
    common::create_test_subtitle(&dir, "alpha.srt")?;
    common::create_test_file(&dir, "notes.txt", "not a subtitle")?;
    common::create_video_stub(&dir, "movie.mp4")?;

    let subtitles = list_directory_subtitles(&dir)?;

    let names: Vec<String> = subtitles
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    assert_eq!(names, vec!["alpha.srt", "beta.srt"]);
    Ok(())
}
