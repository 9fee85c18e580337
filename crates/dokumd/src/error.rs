//! CLI error types.

use dokumd_config::{ConfigError, SourceError};
use dokumd_sync::{PageError, SyncError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0} item(s) failed to convert, see the log for details")]
    Incomplete(usize),
}
