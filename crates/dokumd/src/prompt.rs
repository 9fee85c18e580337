//! Interactive path prompting.
//!
//! Source and destination directories that are neither configured nor given
//! on the command line are asked for on the terminal. An invalid source is
//! reported and asked for again. Without a terminal, a missing or invalid
//! path is an error.

use std::path::PathBuf;

use dokumd_config::validate_source;

use crate::error::CliError;
use crate::output::Output;

const SOURCE_QUESTION: &str = "DokuWiki data directory";
const DEST_QUESTION: &str = "Obsidian vault directory";

/// Resolve the source directory, asking until a valid one is given.
///
/// `ask` returns the user's answer, or `None` at end of input. An empty
/// answer cancels. When `interactive` is false nothing is asked.
pub(crate) fn source_dir<F>(
    configured: Option<PathBuf>,
    interactive: bool,
    output: &Output,
    mut ask: F,
) -> Result<PathBuf, CliError>
where
    F: FnMut(&str) -> Result<Option<String>, CliError>,
{
    let mut candidate = configured;
    loop {
        let path = match candidate.take() {
            Some(path) => path,
            None if interactive => answer_to_path(ask(SOURCE_QUESTION)?, "source directory")?,
            None => answer_to_path(None, "source directory")?,
        };

        if let Err(e) = validate_source(&path) {
            if !interactive {
                return Err(e.into());
            }
            output.warning(&e.to_string());
            continue;
        }
        return Ok(path);
    }
}

/// Resolve the destination directory, asking once if it is not configured.
pub(crate) fn destination_dir<F>(
    configured: Option<PathBuf>,
    interactive: bool,
    mut ask: F,
) -> Result<PathBuf, CliError>
where
    F: FnMut(&str) -> Result<Option<String>, CliError>,
{
    match configured {
        Some(path) => Ok(path),
        None if interactive => answer_to_path(ask(DEST_QUESTION)?, "destination directory"),
        None => answer_to_path(None, "destination directory"),
    }
}

fn answer_to_path(answer: Option<String>, what: &str) -> Result<PathBuf, CliError> {
    match answer.as_deref().map(str::trim) {
        Some("") => Err(CliError::Validation(format!("no {what} given"))),
        Some(path) => Ok(PathBuf::from(path)),
        None => Err(CliError::Validation(format!(
            "{what} is required (set it in dokumd.toml or pass it as a flag)"
        ))),
    }
}
