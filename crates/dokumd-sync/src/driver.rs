//! Whole-tree synchronization.
//!
//! Pages are converted in parallel, assigned destinations in source order,
//! then written in parallel. Media files are mirrored afterwards on the same
//! worker pool. A failure in one page or media file is recorded in the
//! [`SyncReport`] and never stops the others.

use std::fs;
use std::path::{Path, PathBuf};

use dokumd_convert::{ConvertOptions, Converter};
use rayon::prelude::*;

use crate::digest::{WriteOutcome, write_if_changed};
use crate::media::{CopyOutcome, copy_if_newer};
use crate::plan::{DestinationPlanner, page_title};
use crate::scanner::{MediaFile, PageFile, read_page, scan_media, scan_pages};
use crate::{PageError, SyncError};

/// Directory inside the source that holds page text.
const PAGES_DIR: &str = "pages";

/// Settings for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// DokuWiki data directory (contains `pages/`).
    pub source_dir: PathBuf,
    /// Vault directory.
    pub destination_dir: PathBuf,
    /// Media folder name under both source and destination.
    pub media_folder: String,
    /// Worker thread count.
    pub threads: usize,
    /// Page conversion options.
    pub convert: ConvertOptions,
}

/// One item that failed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// Source path of the page or media file.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Outcome counts for a run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Pages discovered.
    pub pages_found: usize,
    /// Pages created or updated.
    pub pages_written: usize,
    /// Pages whose destination already matched.
    pub pages_unchanged: usize,
    /// Pages that failed to convert or write.
    pub pages_failed: usize,
    /// Media files discovered.
    pub media_found: usize,
    /// Media files copied.
    pub media_copied: usize,
    /// Media files whose destination was up to date.
    pub media_skipped: usize,
    /// Media files that failed to copy.
    pub media_failed: usize,
    /// Every failure, in source order.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Whether any page or media file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record_failure(&mut self, path: &Path, message: String) {
        self.failures.push(SyncFailure {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// A converted page waiting for its destination.
struct ConvertedPage {
    title: String,
    markdown: String,
}

/// Mirrors a DokuWiki data directory into an Obsidian vault.
#[derive(Debug)]
pub struct VaultSync {
    options: SyncOptions,
    converter: Converter,
}

impl VaultSync {
    /// Create a synchronizer for the given options.
    #[must_use]
    pub fn new(options: SyncOptions) -> Self {
        let converter = Converter::new(options.convert);
        Self { options, converter }
    }

    /// Convert every page and mirror every media file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the source has no pages directory, the
    /// destination cannot be created, or the worker pool cannot be built.
    /// Per-item failures are reported in the returned [`SyncReport`].
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let pages_dir = self.options.source_dir.join(PAGES_DIR);
        if !pages_dir.is_dir() {
            return Err(SyncError::MissingPages(pages_dir));
        }

        let dest = &self.options.destination_dir;
        fs::create_dir_all(dest).map_err(|source| SyncError::CreateDestination {
            path: dest.clone(),
            source,
        })?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()?;

        let report = pool.install(|| {
            let mut report = SyncReport::default();
            self.sync_pages(&pages_dir, &mut report);
            self.sync_media(&mut report);
            report
        });

        tracing::info!(
            written = report.pages_written,
            unchanged = report.pages_unchanged,
            failed = report.pages_failed,
            media_copied = report.media_copied,
            "sync finished"
        );
        Ok(report)
    }

    fn sync_pages(&self, pages_dir: &Path, report: &mut SyncReport) {
        let pages = scan_pages(pages_dir);
        report.pages_found = pages.len();
        tracing::info!("converting {} pages from {}", pages.len(), pages_dir.display());

        let converted: Vec<_> = pages
            .par_iter()
            .map(|page| self.convert_page(page))
            .collect();

        // Destinations are assigned sequentially so collisions resolve the
        // same way on every run.
        let mut planner = DestinationPlanner::new(self.options.destination_dir.clone());
        let mut planned = Vec::with_capacity(pages.len());
        for (page, result) in pages.iter().zip(converted) {
            match result {
                Ok(converted) => {
                    let dest = planner.assign(page, &converted.title);
                    planned.push((page, dest, converted.markdown));
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    report.pages_failed += 1;
                    report.record_failure(&page.source, e.to_string());
                }
            }
        }

        let outcomes: Vec<_> = planned
            .par_iter()
            .map(|(page, dest, markdown)| {
                let outcome = write_if_changed(dest, markdown).map_err(|source| {
                    PageError::Write {
                        path: dest.clone(),
                        source,
                    }
                });
                (*page, outcome)
            })
            .collect();

        for (page, outcome) in outcomes {
            match outcome {
                Ok(WriteOutcome::Unchanged) => report.pages_unchanged += 1,
                Ok(_) => report.pages_written += 1,
                Err(e) => {
                    tracing::warn!("{e}");
                    report.pages_failed += 1;
                    report.record_failure(&page.source, e.to_string());
                }
            }
        }
    }

    fn convert_page(&self, page: &PageFile) -> Result<ConvertedPage, PageError> {
        let content = read_page(&page.source)?;
        let title = page_title(page, &content);
        tracing::debug!("converting {} as '{title}'", page.rel_path.display());
        Ok(ConvertedPage {
            title,
            markdown: self.converter.convert(&content),
        })
    }

    fn sync_media(&self, report: &mut SyncReport) {
        let media_dir = self.options.source_dir.join(&self.options.media_folder);
        if !media_dir.is_dir() {
            tracing::warn!("media folder not found: {}", media_dir.display());
            return;
        }

        let media = scan_media(&media_dir);
        report.media_found = media.len();
        tracing::info!("mirroring {} media files", media.len());

        let dest_dir = self.options.destination_dir.join(&self.options.media_folder);
        let outcomes: Vec<_> = media
            .par_iter()
            .map(|file: &MediaFile| {
                (file, copy_if_newer(&file.source, &dest_dir.join(&file.rel_path)))
            })
            .collect();

        for (file, outcome) in outcomes {
            match outcome {
                Ok(CopyOutcome::Copied) => report.media_copied += 1,
                Ok(CopyOutcome::Skipped) => report.media_skipped += 1,
                Err(e) => {
                    tracing::warn!("failed to copy {}: {e}", file.source.display());
                    report.media_failed += 1;
                    report.record_failure(&file.source, e.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn options(source: &Path, dest: &Path) -> SyncOptions {
        SyncOptions {
            source_dir: source.to_path_buf(),
            destination_dir: dest.to_path_buf(),
            media_folder: "media".to_owned(),
            threads: 2,
            convert: ConvertOptions::default(),
        }
    }

    fn wiki() -> TempDir {
        let temp = tempfile::tempdir().unwrap();
        let data = temp.path().join("data");
        write(
            &data,
            "pages/start.txt",
            b"====== Welcome ======\nSee [[ns:setup]].",
        );
        write(
            &data,
            "pages/ns/setup.txt",
            b"===== Steps =====\n<code bash>\nmake\n</code>",
        );
        write(&data, "media/ns/logo.png", b"png");
        temp
    }

    #[test]
    fn test_run_converts_pages_and_media() {
        let temp = wiki();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");

        let report = VaultSync::new(options(&data, &vault)).run().unwrap();

        assert_eq!(report.pages_found, 2);
        assert_eq!(report.pages_written, 2);
        assert_eq!(report.media_copied, 1);
        assert!(!report.has_failures());
        assert_eq!(
            fs::read_to_string(vault.join("Welcome.md")).unwrap(),
            "# Welcome\nSee [[setup]]."
        );
        assert_eq!(
            fs::read_to_string(vault.join("ns/setup.md")).unwrap(),
            "## Steps\n\n```bash\nmake\n```"
        );
        assert_eq!(fs::read(vault.join("media/ns/logo.png")).unwrap(), b"png");
    }

    #[test]
    fn test_second_run_writes_nothing() {
        let temp = wiki();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");
        let sync = VaultSync::new(options(&data, &vault));
        sync.run().unwrap();
        let page_mtime = fs::metadata(vault.join("Welcome.md"))
            .unwrap()
            .modified()
            .unwrap();
        let media_mtime = fs::metadata(vault.join("media/ns/logo.png"))
            .unwrap()
            .modified()
            .unwrap();

        let report = sync.run().unwrap();

        assert_eq!(report.pages_written, 0);
        assert_eq!(report.pages_unchanged, 2);
        assert_eq!(report.media_copied, 0);
        assert_eq!(report.media_skipped, 1);
        assert_eq!(
            fs::metadata(vault.join("Welcome.md"))
                .unwrap()
                .modified()
                .unwrap(),
            page_mtime
        );
        assert_eq!(
            fs::metadata(vault.join("media/ns/logo.png"))
                .unwrap()
                .modified()
                .unwrap(),
            media_mtime
        );
    }

    #[test]
    fn test_bad_page_does_not_stop_batch() {
        let temp = wiki();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");
        write(&data, "pages/broken.txt", &[0xFF, 0xFE, 0x00]);

        let report = VaultSync::new(options(&data, &vault)).run().unwrap();

        assert_eq!(report.pages_found, 3);
        assert_eq!(report.pages_written, 2);
        assert_eq!(report.pages_failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, data.join("pages/broken.txt"));
    }

    #[test]
    fn test_title_collision_falls_back_to_stem() {
        let temp = tempfile::tempdir().unwrap();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");
        write(&data, "pages/a.txt", b"====== Notes ======\nfirst");
        write(&data, "pages/b.txt", b"====== Notes ======\nsecond");

        VaultSync::new(options(&data, &vault)).run().unwrap();

        assert_eq!(
            fs::read_to_string(vault.join("Notes.md")).unwrap(),
            "# Notes\nfirst"
        );
        assert_eq!(
            fs::read_to_string(vault.join("b.md")).unwrap(),
            "# Notes\nsecond"
        );
    }

    #[test]
    fn test_overlong_title_is_written() {
        let temp = tempfile::tempdir().unwrap();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");
        let heading = format!("====== {} ======\nbody", "a".repeat(300));
        write(&data, "pages/long.txt", heading.as_bytes());
        write(&data, "pages/other.txt", heading.as_bytes());

        let report = VaultSync::new(options(&data, &vault)).run().unwrap();

        assert_eq!(report.pages_failed, 0);
        assert_eq!(report.pages_written, 2);
        let names: Vec<_> = fs::read_dir(&vault)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|name| name.len() <= 255));
        assert!(names.contains(&format!("{}.md", "a".repeat(244))));
        assert!(names.contains(&"other.md".to_owned()));
    }

    #[test]
    fn test_missing_media_folder_is_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let data = temp.path().join("data");
        write(&data, "pages/start.txt", b"hello");

        let report = VaultSync::new(options(&data, &temp.path().join("vault")))
            .run()
            .unwrap();

        assert_eq!(report.pages_written, 1);
        assert_eq!(report.media_found, 0);
    }

    #[test]
    fn test_missing_pages_dir_is_fatal() {
        let temp = tempfile::tempdir().unwrap();

        let err = VaultSync::new(options(temp.path(), &temp.path().join("vault")))
            .run()
            .unwrap_err();

        assert!(matches!(err, SyncError::MissingPages(_)));
    }

    #[test]
    fn test_changed_page_is_rewritten() {
        let temp = wiki();
        let data = temp.path().join("data");
        let vault = temp.path().join("vault");
        let sync = VaultSync::new(options(&data, &vault));
        sync.run().unwrap();

        write(&data, "pages/start.txt", b"====== Welcome ======\nUpdated.");
        let report = sync.run().unwrap();

        assert_eq!(report.pages_written, 1);
        assert_eq!(report.pages_unchanged, 1);
        assert_eq!(
            fs::read_to_string(vault.join("Welcome.md")).unwrap(),
            "# Welcome\nUpdated."
        );
    }
}
