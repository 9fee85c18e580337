//! `dokumd convert` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use dokumd_config::{CliSettings, Config};
use dokumd_convert::ConvertOptions;
use dokumd_sync::{SyncOptions, VaultSync};

use crate::error::CliError;
use crate::output::Output;
use crate::{logging, prompt};

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to configuration file (default: auto-discover dokumd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// DokuWiki data directory containing pages/ (overrides config).
    #[arg(short, long, env = "DOKUMD_SOURCE")]
    source: Option<PathBuf>,

    /// Obsidian vault directory (overrides config).
    #[arg(short, long, env = "DOKUMD_DEST")]
    dest: Option<PathBuf>,

    /// Media folder name inside source and vault (overrides config).
    #[arg(long)]
    media_folder: Option<String>,

    /// Number of worker threads (overrides config).
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Default width for embedded images (overrides config).
    #[arg(long)]
    image_width: Option<u32>,

    /// Log file to append to (overrides config).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose output (debug logging).
    #[arg(short, long)]
    verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, no usable source or
    /// destination is available, the run cannot start, or any page or media
    /// file failed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source,
            destination_dir: self.dest,
            media_folder: self.media_folder,
            threads: self.threads,
            image_width: self.image_width,
            log_file: self.log_file,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        logging::init(
            self.verbose,
            &config.logging_resolved.level,
            Some(&config.logging_resolved.file),
        )?;
        if let Some(path) = &config.config_path {
            tracing::debug!("loaded configuration from {}", path.display());
        }

        let interactive = output.is_interactive();
        let ask = |question: &str| output.ask(question).map_err(CliError::from);
        let source_dir = prompt::source_dir(
            config.paths_resolved.source_dir.clone(),
            interactive,
            &output,
            ask,
        )?;
        let destination_dir = prompt::destination_dir(
            config.paths_resolved.destination_dir.clone(),
            interactive,
            ask,
        )?;

        output.highlight("Converting DokuWiki to Obsidian");
        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Destination: {}", destination_dir.display()));
        output.info(&format!("Threads: {}", config.runtime.threads));

        let started = Instant::now();
        let sync = VaultSync::new(SyncOptions {
            source_dir,
            destination_dir,
            media_folder: config.paths_resolved.media_folder.clone(),
            threads: config.runtime.threads,
            convert: ConvertOptions {
                default_image_width: config.convert.default_image_width,
            },
        });
        let report = sync.run()?;
        output.summary(&report, started.elapsed());

        if report.has_failures() {
            return Err(CliError::Incomplete(report.failures.len()));
        }
        Ok(())
    }
}
