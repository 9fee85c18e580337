//! DokuWiki data tree to Obsidian vault synchronization.
//!
//! [`VaultSync`] walks `<source>/pages` for `*.txt` pages, converts each one
//! with [`dokumd_convert::Converter`] and writes it under the vault using the
//! page title as the file name. Writes are skipped when the MD5 digest of the
//! new text matches the file on disk. Media files are mirrored by relative
//! path and copied only when the vault copy is missing or older.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use dokumd_convert::ConvertOptions;
//! use dokumd_sync::{SyncOptions, VaultSync};
//!
//! let report = VaultSync::new(SyncOptions {
//!     source_dir: PathBuf::from("/var/www/dokuwiki/data"),
//!     destination_dir: PathBuf::from("vault"),
//!     media_folder: "media".to_owned(),
//!     threads: 4,
//!     convert: ConvertOptions::default(),
//! })
//! .run()?;
//! assert!(!report.has_failures());
//! # Ok::<(), dokumd_sync::SyncError>(())
//! ```

mod digest;
mod driver;
mod error;
mod media;
mod plan;
mod scanner;

pub use digest::{WriteOutcome, content_digest, write_if_changed};
pub use driver::{SyncFailure, SyncOptions, SyncReport, VaultSync};
pub use error::{PageError, SyncError};
pub use media::{CopyOutcome, copy_if_newer};
pub use plan::{DestinationPlanner, page_title};
pub use scanner::{MediaFile, PageFile, read_page, scan_media, scan_pages};
