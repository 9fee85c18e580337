//! Destination naming.
//!
//! A page `ns/sub/page.txt` with title `Setup Guide` lands at
//! `<dest>/ns/sub/Setup Guide.md`. When two pages claim the same destination
//! the later one falls back to its file stem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dokumd_convert::{extract_title, sanitize_filename, sanitize_page_name};

use crate::PageFile;

/// Title a page is saved under: its first level-1 heading or its file stem.
#[must_use]
pub fn page_title(page: &PageFile, content: &str) -> String {
    match extract_title(content) {
        Some(title) => sanitize_page_name(title),
        None => sanitize_page_name(&page.stem()),
    }
}

/// Destination directory mirroring the page's namespace folders.
fn destination_dir(dest_root: &Path, page: &PageFile) -> PathBuf {
    let mut dir = dest_root.to_path_buf();
    if let Some(parent) = page.rel_path.parent() {
        for component in parent.iter() {
            dir.push(sanitize_filename(&component.to_string_lossy()));
        }
    }
    dir
}

/// Assigns unique destination paths in page order.
///
/// Paths are compared case-insensitively so the result is also unique on
/// case-insensitive filesystems.
#[derive(Debug)]
pub struct DestinationPlanner {
    root: PathBuf,
    taken: HashSet<String>,
}

impl DestinationPlanner {
    /// Create a planner for the vault at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            taken: HashSet::new(),
        }
    }

    /// Reserve a destination for `page` saved under `title`.
    pub fn assign(&mut self, page: &PageFile, title: &str) -> PathBuf {
        let dir = destination_dir(&self.root, page);
        let preferred = dir.join(format!("{title}.md"));
        if self.claim(&preferred) {
            return preferred;
        }

        let stem = sanitize_page_name(&page.stem());
        tracing::warn!(
            "title '{title}' of {} is already used, saving as '{stem}.md'",
            page.rel_path.display()
        );
        let mut candidate = dir.join(format!("{stem}.md"));
        let mut suffix = 2;
        while !self.claim(&candidate) {
            candidate = dir.join(format!("{stem}-{suffix}.md"));
            suffix += 1;
        }
        candidate
    }

    fn claim(&mut self, path: &Path) -> bool {
        self.taken.insert(path.to_string_lossy().to_lowercase())
    }
}
