/*!
 * Persistent storage for per-video playback positions.
 *
 * This module provides SQLite-based persistence for:
 * - Last playback position per video path
 * - Whether the video was playing when the session ended
 */

// Allow dead code - store types are for library consumers
#![allow(dead_code)]

pub mod schema;
pub mod connection;
pub mod repository;

// Re-export main types
pub use connection::StoreConnection;
pub use repository::{ResumeState, ResumeStore};
