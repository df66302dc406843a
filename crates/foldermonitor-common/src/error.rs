//! Common error type used throughout foldermonitor.
//!
//! Fatal startup failures (watch root, watcher backend) and
//! recoverable per-file failures (copy, delete) share this enum; callers
//! decide whether a given error ends the process or is logged and skipped.

use std::path::PathBuf;

/// Common error type for foldermonitor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watch root does not exist or is not a directory.
    #[error("Watch root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A copy source is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The filesystem watch backend failed.
    #[error("Watcher error: {0}")]
    Watch(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new NotADirectory error.
    pub fn not_a_directory<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create a new NotAFile error.
    pub fn not_a_file<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotAFile(path.into())
    }

    /// Create a new Watch error.
    pub fn watch<S: Into<String>>(msg: S) -> Self {
        Self::Watch(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
