/*!
 * Repository layer for the resume-position store.
 *
 * This module provides a high-level API over the resume table, abstracting
 * away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use super::connection::StoreConnection;

/// Saved playback state for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    /// Last playback position in milliseconds
    pub position_ms: u64,

    /// Whether the video was playing when the session ended
    pub was_playing: bool,
}

/// Repository for resume-position operations
#[derive(Clone)]
pub struct ResumeStore {
    /// Store connection
    db: StoreConnection,
}

impl ResumeStore {
    /// Create a store with the given connection
    pub fn new(db: StoreConnection) -> Self {
        Self { db }
    }

    /// Create a store at the default database location
    pub fn new_default() -> Result<Self> {
        let db = StoreConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = StoreConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Save the playback state for a video, replacing any previous state
    pub async fn save<P: AsRef<Path>>(&self, video_path: P, state: &ResumeState) -> Result<()> {
        let video_path = video_path.as_ref().to_string_lossy().to_string();
        let state = state.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT OR REPLACE INTO resume_positions
                        (video_path, position_ms, was_playing, updated_at)
                    VALUES (?1, ?2, ?3, datetime('now'))
                    "#,
                    params![video_path, state.position_ms as i64, state.was_playing],
                )?;
                Ok(())
            })
            .await
    }

    /// Get the saved playback state for a video, if any
    pub async fn get<P: AsRef<Path>>(&self, video_path: P) -> Result<Option<ResumeState>> {
        let video_path = video_path.as_ref().to_string_lossy().to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT position_ms, was_playing FROM resume_positions WHERE video_path = ?1",
                        [video_path],
                        |row| {
                            Ok(ResumeState {
                                position_ms: row.get::<_, i64>(0)?.max(0) as u64,
                                was_playing: row.get(1)?,
                            })
                        },
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Saved position for a video, zero when none exists
    pub async fn position_or_zero<P: AsRef<Path>>(&self, video_path: P) -> Result<u64> {
        Ok(self
            .get(video_path)
            .await?
            .map(|s| s.position_ms)
            .unwrap_or(0))
    }

    /// Saved playing flag for a video; absent state defaults to autoplay
    pub async fn was_playing_or_default<P: AsRef<Path>>(
        &self,
        video_path: P,
        default: bool,
    ) -> Result<bool> {
        Ok(self
            .get(video_path)
            .await?
            .map(|s| s.was_playing)
            .unwrap_or(default))
    }

    /// Clear the saved state for one video.
    ///
    /// Called when the video completes or the user exits deliberately.
    pub async fn clear<P: AsRef<Path>>(&self, video_path: P) -> Result<()> {
        let video_path = video_path.as_ref().to_string_lossy().to_string();

        self.db
            .execute_async(move |conn| {
                let removed = conn.execute(
                    "DELETE FROM resume_positions WHERE video_path = ?1",
                    [&video_path],
                )?;
                if removed > 0 {
                    debug!("Cleared resume state for {}", video_path);
                }
                Ok(())
            })
            .await
    }

    /// Clear all saved states; returns the number of rows removed
    pub async fn clear_all(&self) -> Result<usize> {
        self.db
            .execute_async(|conn| {
                let removed = conn.execute("DELETE FROM resume_positions", [])?;
                Ok(removed)
            })
            .await
    }

    /// All saved states, most recently updated first
    pub async fn list(&self) -> Result<Vec<(String, ResumeState)>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT video_path, position_ms, was_playing FROM resume_positions
                     ORDER BY updated_at DESC",
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        ResumeState {
                            position_ms: row.get::<_, i64>(1)?.max(0) as u64,
                            was_playing: row.get(2)?,
                        },
                    ))
                })?;

                let mut result = Vec::new();
                for row in rows {
                    result.push(row?);
                }
                Ok(result)
            })
            .await
    }

    /// Number of saved states
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM resume_positions", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
    }
}
