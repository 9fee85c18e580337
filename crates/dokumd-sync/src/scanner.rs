//! Source discovery by filesystem walking.
//!
//! Pages are `*.txt` files under `pages/`; media is every file under the
//! media folder. Hidden files and directories are skipped and results are
//! sorted by relative path so runs are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::PageError;

/// A DokuWiki page on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// Absolute path to the `.txt` file.
    pub source: PathBuf,
    /// Path relative to the pages directory (e.g., `ns/sub/page.txt`).
    pub rel_path: PathBuf,
}

impl PageFile {
    /// File name without the `.txt` extension.
    #[must_use]
    pub fn stem(&self) -> String {
        self.rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A media file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Absolute path to the file.
    pub source: PathBuf,
    /// Path relative to the media directory.
    pub rel_path: PathBuf,
}

/// Find all pages under `pages_dir`.
///
/// Returns an empty Vec if the directory doesn't exist.
#[must_use]
pub fn scan_pages(pages_dir: &Path) -> Vec<PageFile> {
    let mut found = Vec::new();
    walk(pages_dir, Path::new(""), &mut found);
    let mut pages: Vec<_> = found
        .into_iter()
        .filter(|(_, rel)| rel.extension().is_some_and(|e| e == "txt"))
        .map(|(source, rel_path)| PageFile { source, rel_path })
        .collect();
    pages.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    pages
}

/// Find all media files under `media_dir`.
///
/// Returns an empty Vec if the directory doesn't exist.
#[must_use]
pub fn scan_media(media_dir: &Path) -> Vec<MediaFile> {
    let mut found = Vec::new();
    walk(media_dir, Path::new(""), &mut found);
    let mut media: Vec<_> = found
        .into_iter()
        .map(|(source, rel_path)| MediaFile { source, rel_path })
        .collect();
    media.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    media
}

/// Read a page as UTF-8 text.
///
/// # Errors
///
/// Returns [`PageError::Read`] if the file cannot be read and
/// [`PageError::Encoding`] if it is not valid UTF-8.
pub fn read_page(path: &Path) -> Result<String, PageError> {
    let bytes = fs::read(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| PageError::Encoding(path.to_path_buf()))
}

/// Collect `(absolute, relative)` paths of regular files below `dir`.
fn walk(dir: &Path, rel_dir: &Path, out: &mut Vec<(PathBuf, PathBuf)>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                tracing::warn!("failed to read directory {}: {e}", dir.display());
            }
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        // Skip hidden files/dirs
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let rel_path = rel_dir.join(&name);
        if file_type.is_dir() {
            walk(&entry.path(), &rel_path, out);
        } else {
            out.push((entry.path(), rel_path));
        }
    }
}
