/*!
 * Error types for the plusplay application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while scanning for media files
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory
    #[error("Scan root is not a directory: {0}")]
    InvalidRoot(String),

    /// Error walking a directory tree
    #[error("Failed to walk directory: {0}")]
    WalkFailed(String),

    /// Error probing a media file for its duration
    #[error("Duration probe failed for {path}: {message}")]
    ProbeFailed {
        /// Path of the file that failed to probe
        path: String,
        /// Underlying probe error
        message: String,
    },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file could not be read
    #[error("Failed to read subtitle file: {0}")]
    ReadFailed(String),

    /// The transcript produced no caption windows
    #[error("No caption windows found in transcript")]
    Empty,
}

/// Errors that can occur in the resume-position store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error opening or initializing the database
    #[error("Failed to open resume store: {0}")]
    OpenFailed(String),

    /// Error executing a query
    #[error("Resume store query failed: {0}")]
    QueryFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the media scanner
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the resume store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
