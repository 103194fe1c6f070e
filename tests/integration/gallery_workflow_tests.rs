/*!
 * End-to-end tests for the gallery workflow: scan a tree of files,
 * browse it, open playback sessions, and exercise the resume store
 */

use anyhow::Result;
use std::path::PathBuf;

use plusplay::app_controller::Controller;
use plusplay::library::{GalleryBrowser, GalleryItem};

use crate::common;

struct Fixture {
    controller: Controller,
    root: PathBuf,
    _temp_dir: tempfile::TempDir,
}

/// Builds a small on-disk library:
///
///   movies/trailer.mp4
///   movies/drama/slow.mp4 (with sidecar slow.srt)
///   movies/drama/quiet.mp4
///   movies/action/fast.mkv
///   clips/short.mov
fn fixture() -> Result<Fixture> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    common::create_video_stub(&root, "movies/trailer.mp4")?;
    common::create_video_stub(&root, "movies/drama/slow.mp4")?;
    common::create_video_stub(&root, "movies/drama/quiet.mp4")?;
    common::create_video_stub(&root, "movies/action/fast.mkv")?;
    common::create_video_stub(&root, "clips/short.mov")?;
    common::create_test_subtitle(&root, "movies/drama/slow.srt")?;

    let controller = Controller::with_config(common::test_config(&temp_dir))?;

    Ok(Fixture {
        controller,
        root,
        _temp_dir: temp_dir,
    })
}

/// Test scanning and organizing the fixture tree
#[tokio::test]
async fn test_scan_library_withFixtureTree_shouldOrganizeByFolder() -> Result<()> {
    let fx = fixture()?;

    let tree = fx.controller.scan_library(&fx.root).await?;

    assert_eq!(tree.total_videos(), 5);

    let drama = tree
        .find(&fx.root.join("movies/drama"))
        .expect("drama folder missing");
    let names: Vec<&str> = drama.videos.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["quiet.mp4", "slow.mp4"]);
    Ok(())
}

/// Test browsing the organized tree with the folder stack
#[tokio::test]
async fn test_browser_withFixtureTree_shouldNavigateFolders() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let mut browser = GalleryBrowser::new(&tree);
    assert_eq!(browser.title(), "Plus Play");

    // Walking down two levels shows the drama folder's videos behind the
    // back item
    assert!(browser.enter("movies"));
    assert!(browser.enter("drama"));
    assert_eq!(browser.title(), "drama");

    let items = browser.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], GalleryItem::Back);
    assert!(matches!(items[1], GalleryItem::Video(v) if v.name == "quiet.mp4"));
    assert!(matches!(items[2], GalleryItem::Video(v) if v.name == "slow.mp4"));

    assert!(browser.back());
    assert_eq!(browser.title(), "movies");
    assert!(browser.back());
    assert!(!browser.back());
    assert!(browser.at_root());
    Ok(())
}

/// Test opening a session with no saved state
#[tokio::test]
async fn test_open_session_withNoSavedState_shouldStartFromZero() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let drama = tree.find(&fx.root.join("movies/drama")).unwrap();
    let video_path = fx.root.join("movies/drama/quiet.mp4");

    let session = fx
        .controller
        .open_session(drama.videos.clone(), &video_path)
        .await?;

    assert_eq!(session.start_position_ms, 0);
    assert!(session.autoplay);
    assert!(session.captions.is_none());
    assert_eq!(session.playlist.len(), 2);
    assert_eq!(session.playlist.index(), 0);
    Ok(())
}

/// Test that a saved position and paused state are restored
#[tokio::test]
async fn test_open_session_withSavedState_shouldRestorePositionAndPause() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let drama = tree.find(&fx.root.join("movies/drama")).unwrap();
    let video_path = fx.root.join("movies/drama/slow.mp4");

    fx.controller.save_progress(&video_path, 42_000, false).await?;

    let session = fx
        .controller
        .open_session(drama.videos.clone(), &video_path)
        .await?;

    assert_eq!(session.start_position_ms, 42_000);
    assert!(!session.autoplay);
    Ok(())
}

/// Test that a sidecar subtitle is auto-loaded with the session
#[tokio::test]
async fn test_open_session_withSidecarSubtitle_shouldLoadCaptions() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let drama = tree.find(&fx.root.join("movies/drama")).unwrap();
    let video_path = fx.root.join("movies/drama/slow.mp4");

    let session = fx
        .controller
        .open_session(drama.videos.clone(), &video_path)
        .await?;

    let captions = session.captions.expect("sidecar captions missing");
    assert_eq!(captions.windows.len(), 3);
    assert_eq!(
        captions.caption_at(2_000).map(|w| w.text.as_str()),
        Some("This is a test subtitle.")
    );
    Ok(())
}

/// Test completion clears the saved state and advances the playlist
#[tokio::test]
async fn test_complete_withSavedState_shouldClearAndAdvance() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let drama = tree.find(&fx.root.join("movies/drama")).unwrap();
    let video_path = fx.root.join("movies/drama/quiet.mp4");

    fx.controller.save_progress(&video_path, 30_000, true).await?;

    let mut session = fx
        .controller
        .open_session(drama.videos.clone(), &video_path)
        .await?;

    let next = fx
        .controller
        .complete(&mut session.playlist, &video_path)
        .await?;

    assert_eq!(next.map(|v| v.name), Some("slow.mp4".to_string()));
    assert_eq!(fx.controller.store().get(&video_path).await?, None);
    Ok(())
}

/// Test a deliberate exit clears the saved state
#[tokio::test]
async fn test_user_exit_withSavedState_shouldClearState() -> Result<()> {
    let fx = fixture()?;
    let video_path = fx.root.join("clips/short.mov");

    fx.controller.save_progress(&video_path, 15_000, true).await?;
    assert!(fx.controller.store().get(&video_path).await?.is_some());

    fx.controller.user_exit(&video_path).await?;

    assert_eq!(fx.controller.store().get(&video_path).await?, None);
    Ok(())
}

/// Test that interrupted progress survives across controller instances
#[tokio::test]
async fn test_save_progress_acrossControllers_shouldPersistOnDisk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_video_stub(&root, "movie.mp4")?;
    let video_path = root.join("movie.mp4");

    let config = common::test_config(&temp_dir);

    let first = Controller::with_config(config.clone())?;
    first.save_progress(&video_path, 55_000, true).await?;
    drop(first);

    let second = Controller::with_config(config)?;
    assert_eq!(second.store().position_or_zero(&video_path).await?, 55_000);
    Ok(())
}

/// Test the indented tree rendering
#[tokio::test]
async fn test_format_tree_withFixtureTree_shouldIndentByDepth() -> Result<()> {
    let fx = fixture()?;
    let tree = fx.controller.scan_library(&fx.root).await?;

    let rendered = Controller::format_tree(&tree);

    assert!(rendered.contains("movies/"));
    assert!(rendered.contains("    drama/"));
    assert!(rendered.contains("slow.mp4  [00:00]"));
    Ok(())
}
