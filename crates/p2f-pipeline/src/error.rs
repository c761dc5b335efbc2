//! Error types for pipeline operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch before or while it is scheduled
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input path could not be inspected or listed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Scheduler error (tokio runtime issues)
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

/// Why a single file ended up `Failed`
///
/// These never escape the batch; they are recorded in the file's report.
#[derive(Error, Debug)]
pub enum ItemError {
    /// Extraction gateway failed (LLM, timeout, unreadable response)
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Another file already has the rendered name
    #[error("Target already exists: {}", .0.display())]
    Collision(PathBuf),

    /// Filesystem rename failed
    #[error("Rename to {} failed: {source}", .target.display())]
    Rename {
        /// Intended new path
        target: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Processing task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(String),
}
