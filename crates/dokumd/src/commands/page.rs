//! `dokumd page` command implementation.

use std::path::PathBuf;

use clap::Args;
use console::Term;
use dokumd_config::{CliSettings, Config};
use dokumd_convert::{ConvertOptions, Converter};
use dokumd_sync::read_page;

use crate::error::CliError;
use crate::logging;

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// DokuWiki page file (`.txt`).
    file: PathBuf,

    /// Path to configuration file (default: auto-discover dokumd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default width for embedded images (overrides config).
    #[arg(long)]
    image_width: Option<u32>,

    /// Enable verbose output (debug logging).
    #[arg(short, long)]
    verbose: bool,
}

impl PageArgs {
    /// Execute the page command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the page cannot be
    /// read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            image_width: self.image_width,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        logging::init(self.verbose, "warn", None)?;

        let content = read_page(&self.file)?;
        let converter = Converter::new(ConvertOptions {
            default_image_width: config.convert.default_image_width,
        });
        Term::stdout().write_line(&converter.convert(&content))?;
        Ok(())
    }
}
