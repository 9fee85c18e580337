//! Tracing setup.
//!
//! Events go to stderr and, when a log file is configured, are also appended
//! to that file without ANSI colors.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::CliError;

/// Install the global subscriber.
///
/// `--verbose` forces DEBUG; otherwise `RUST_LOG` wins over `default_level`.
pub(crate) fn init(
    verbose: bool,
    default_level: &str,
    log_file: Option<&Path>,
) -> Result<(), CliError> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter(verbose, default_level))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn filter(verbose: bool, default_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }
}
