//! Hash-gated writes.
//!
//! A page is rewritten only when the MD5 digest of the new content differs
//! from the digest of the file already on disk, so unchanged pages keep
//! their modification time across runs.

use std::fs;
use std::io;
use std::path::Path;

use md5::{Digest, Md5};

/// Result of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The destination did not exist.
    Created,
    /// The destination existed with different content.
    Updated,
    /// The destination already had identical content.
    Unchanged,
}

impl WriteOutcome {
    /// Whether the file was written.
    #[must_use]
    pub fn is_written(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Hex-encoded MD5 digest of `bytes`.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Write `content` to `path` unless the file already holds the same bytes.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an I/O error if the existing file cannot be read or the new one
/// cannot be written.
pub fn write_if_changed(path: &Path, content: &str) -> io::Result<WriteOutcome> {
    let new_digest = content_digest(content.as_bytes());

    let outcome = match fs::read(path) {
        Ok(existing) if content_digest(&existing) == new_digest => {
            return Ok(WriteOutcome::Unchanged);
        }
        Ok(_) => WriteOutcome::Updated,
        Err(e) if e.kind() == io::ErrorKind::NotFound => WriteOutcome::Created,
        Err(e) => return Err(e),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!(digest = %new_digest, "wrote {}", path.display());
    Ok(outcome)
}
