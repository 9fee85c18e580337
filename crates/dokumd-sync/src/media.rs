//! Media mirroring by modification time.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Result of [`copy_if_newer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The file was copied.
    Copied,
    /// The destination was at least as new as the source.
    Skipped,
}

/// Copy `source` to `dest` when `dest` is missing or strictly older.
///
/// The copy gets the source's modification time and permissions, so a second
/// run sees equal timestamps and skips it. An outdated destination is removed
/// before the copy, which also replaces copies of read-only files.
///
/// # Errors
///
/// Returns an I/O error if either file's metadata cannot be read or the copy
/// fails.
pub fn copy_if_newer(source: &Path, dest: &Path) -> io::Result<CopyOutcome> {
    let source_meta = fs::metadata(source)?;
    let source_mtime = source_meta.modified()?;

    match fs::metadata(dest) {
        Ok(meta) if meta.modified()? >= source_mtime => return Ok(CopyOutcome::Skipped),
        Ok(_) => fs::remove_file(dest)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // The timestamp is set through the handle opened for writing, before the
    // source's (possibly read-only) permissions are applied.
    let mut reader = File::open(source)?;
    let mut writer = File::create(dest)?;
    io::copy(&mut reader, &mut writer)?;
    writer.set_modified(source_mtime)?;
    drop(writer);
    fs::set_permissions(dest, source_meta.permissions())?;
    Ok(CopyOutcome::Copied)
}
