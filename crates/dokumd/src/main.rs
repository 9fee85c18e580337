//! dokumd CLI - DokuWiki to Obsidian converter.
//!
//! Provides commands for:
//! - `convert`: Mirror a DokuWiki data directory into an Obsidian vault
//! - `page`: Convert a single page and print the markdown

mod commands;
mod error;
mod logging;
mod output;
mod prompt;

use clap::{Parser, Subcommand};

use commands::{ConvertArgs, PageArgs};
use output::Output;

/// dokumd - DokuWiki to Obsidian converter.
#[derive(Parser)]
#[command(name = "dokumd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DokuWiki data directory into an Obsidian vault.
    Convert(ConvertArgs),
    /// Convert one page and print it to stdout.
    Page(PageArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Page(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "dokumd",
            "convert",
            "--source",
            "data",
            "--dest",
            "vault",
            "--threads",
            "8",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Convert(_)));
    }

    #[test]
    fn test_parse_page_requires_file() {
        assert!(Cli::try_parse_from(["dokumd", "page"]).is_err());
        assert!(Cli::try_parse_from(["dokumd", "page", "start.txt"]).is_ok());
    }
}
