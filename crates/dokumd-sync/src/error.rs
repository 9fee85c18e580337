//! Error types for vault synchronization.

use std::io;
use std::path::PathBuf;

/// Errors that stop a whole run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Source directory has no `pages/` folder.
    #[error("Pages directory not found: {}", .0.display())]
    MissingPages(PathBuf),
    /// Destination root cannot be created.
    #[error("Cannot create destination {}: {source}", path.display())]
    CreateDestination {
        /// Destination root.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Worker pool cannot be started.
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors for a single page. The run records them and continues.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Page cannot be read.
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        /// Page path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Page is not valid UTF-8.
    #[error("Not valid UTF-8: {}", .0.display())]
    Encoding(PathBuf),
    /// Converted page cannot be written.
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}
